use regex::Regex;
use std::sync::OnceLock;

use crate::auth::application::ports::outgoing::UserQuery;

pub const MAX_USERNAME_LENGTH: usize = 20;
pub const DEFAULT_MAX_SUFFIX: u32 = 10_000;

fn disallowed_characters() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_.\-]+").expect("username pattern is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocateUsernameError {
    #[error("Name contains no characters usable in a username")]
    EmptyBase,

    #[error("No free username for '{base}' after {max_suffix} attempts")]
    AllocationExhausted { base: String, max_suffix: u32 },

    #[error("Query error: {0}")]
    QueryError(String),
}

/// Derives a unique username from a person's name.
///
/// The base is `first + last` with every run of characters outside
/// `[a-zA-Z0-9_.-]` removed, lowercased and cut to 20 characters. While the
/// candidate is taken, a counter is appended to the base (`base1`, `base2`,
/// ...), trimming the base so the result stays within 20 characters.
///
/// Uniqueness is only guaranteed together with the unique index on
/// `users.username`; a concurrent registration can still win the race and
/// surface as `DuplicateUsername` on insert.
#[derive(Debug, Clone)]
pub struct UsernameAllocator {
    max_suffix: u32,
}

impl Default for UsernameAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUFFIX)
    }
}

impl UsernameAllocator {
    pub fn new(max_suffix: u32) -> Self {
        Self { max_suffix }
    }

    pub fn base_username(first_name: &str, last_name: &str) -> String {
        let joined = format!("{}{}", first_name, last_name);
        let sanitized = disallowed_characters()
            .replace_all(&joined, "")
            .to_lowercase();

        // Only ASCII survives sanitizing, so byte and char counts agree.
        sanitized.chars().take(MAX_USERNAME_LENGTH).collect()
    }

    fn with_suffix(base: &str, suffix: u32) -> String {
        let suffix = suffix.to_string();
        let keep = MAX_USERNAME_LENGTH
            .saturating_sub(suffix.len())
            .min(base.len());
        format!("{}{}", &base[..keep], suffix)
    }

    pub async fn allocate<Q>(
        &self,
        first_name: &str,
        last_name: &str,
        query: &Q,
    ) -> Result<String, AllocateUsernameError>
    where
        Q: UserQuery + ?Sized,
    {
        let base = Self::base_username(first_name, last_name);
        if base.is_empty() {
            return Err(AllocateUsernameError::EmptyBase);
        }

        let mut candidate = base.clone();
        let mut suffix: u32 = 0;

        loop {
            let taken = query
                .count_by_username(&candidate)
                .await
                .map_err(|e| AllocateUsernameError::QueryError(e.to_string()))?;

            if taken == 0 {
                return Ok(candidate);
            }

            suffix += 1;
            if suffix > self.max_suffix {
                tracing::warn!(base = %base, max_suffix = self.max_suffix, "Username space exhausted");
                return Err(AllocateUsernameError::AllocationExhausted {
                    base,
                    max_suffix: self.max_suffix,
                });
            }

            candidate = Self::with_suffix(&base, suffix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::UserAccount;
    use crate::auth::application::ports::outgoing::{AccountFilter, UserQueryError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct TakenUsernames {
        taken: HashSet<String>,
        lookups: Mutex<Vec<String>>,
        should_fail: bool,
    }

    impl TakenUsernames {
        fn new(taken: &[&str]) -> Self {
            Self {
                taken: taken.iter().map(|s| s.to_string()).collect(),
                lookups: Mutex::new(Vec::new()),
                should_fail: false,
            }
        }
    }

    #[async_trait]
    impl UserQuery for TakenUsernames {
        async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<UserAccount>, UserQueryError> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<UserAccount>, UserQueryError> {
            Ok(None)
        }

        async fn count_by_username(&self, username: &str) -> Result<u64, UserQueryError> {
            if self.should_fail {
                return Err(UserQueryError::DatabaseError("connection lost".to_string()));
            }
            self.lookups.lock().unwrap().push(username.to_string());
            Ok(u64::from(self.taken.contains(username)))
        }

        async fn list_accounts(
            &self,
            _filter: AccountFilter,
            _limit: u64,
            _offset: u64,
        ) -> Result<Vec<UserAccount>, UserQueryError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_base_username_sanitizes_and_lowercases() {
        assert_eq!(UsernameAllocator::base_username("John", "Doe"), "johndoe");
        assert_eq!(
            UsernameAllocator::base_username("Jean-Luc", "O'Brien"),
            "jean-lucobrien"
        );
        assert_eq!(
            UsernameAllocator::base_username("Anna Maria", "Smith.Jr_"),
            "annamariasmith.jr_"
        );
        assert_eq!(UsernameAllocator::base_username("Zoë", "Łukasz"), "zoukasz");
    }

    #[test]
    fn test_base_username_truncates_to_twenty() {
        let base = UsernameAllocator::base_username("Bartholomew", "Montgomery-Smythe");

        assert_eq!(base, "bartholomewmontgomer");
        assert_eq!(base.len(), MAX_USERNAME_LENGTH);
    }

    #[test]
    fn test_suffix_keeps_length_bound() {
        let base = "bartholomewmontgomer";

        assert_eq!(UsernameAllocator::with_suffix(base, 1), "bartholomewmontgome1");
        assert_eq!(UsernameAllocator::with_suffix(base, 42), "bartholomewmontgom42");
        assert_eq!(UsernameAllocator::with_suffix("johndoe", 3), "johndoe3");
    }

    #[tokio::test]
    async fn test_free_base_is_used_directly() {
        let query = TakenUsernames::new(&[]);

        let username = UsernameAllocator::default()
            .allocate("John", "Doe", &query)
            .await
            .unwrap();

        assert_eq!(username, "johndoe");
        assert_eq!(*query.lookups.lock().unwrap(), vec!["johndoe"]);
    }

    #[tokio::test]
    async fn test_suffix_is_appended_to_base_not_accumulated() {
        let query = TakenUsernames::new(&["johndoe", "johndoe1", "johndoe2"]);

        let username = UsernameAllocator::default()
            .allocate("John", "Doe", &query)
            .await
            .unwrap();

        assert_eq!(username, "johndoe3");
        assert_eq!(
            *query.lookups.lock().unwrap(),
            vec!["johndoe", "johndoe1", "johndoe2", "johndoe3"]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_is_reported() {
        let query = TakenUsernames::new(&["johndoe", "johndoe1", "johndoe2"]);

        let result = UsernameAllocator::new(2)
            .allocate("John", "Doe", &query)
            .await;

        assert_eq!(
            result,
            Err(AllocateUsernameError::AllocationExhausted {
                base: "johndoe".to_string(),
                max_suffix: 2,
            })
        );
    }

    #[tokio::test]
    async fn test_empty_base_is_rejected() {
        let query = TakenUsernames::new(&[]);

        let result = UsernameAllocator::default()
            .allocate("!!!", "   ", &query)
            .await;

        assert_eq!(result, Err(AllocateUsernameError::EmptyBase));
        assert!(query.lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let mut query = TakenUsernames::new(&[]);
        query.should_fail = true;

        let result = UsernameAllocator::default()
            .allocate("John", "Doe", &query)
            .await;

        assert!(matches!(result, Err(AllocateUsernameError::QueryError(_))));
    }
}
