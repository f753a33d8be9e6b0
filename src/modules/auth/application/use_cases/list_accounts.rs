use async_trait::async_trait;

use crate::auth::application::domain::{AccountStatus, Role, UserAccount};
use crate::auth::application::ports::outgoing::{AccountFilter, UserQuery};

pub const DEFAULT_PAGE_SIZE: u64 = 100;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Postgres binds OFFSET as a signed 64-bit integer.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

// ========================= List Accounts Query =========================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAccountsQuery {
    filter: AccountFilter,
    limit: u64,
    offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListAccountsQueryError {
    #[error("Filter by either role or status, not both")]
    ConflictingFilters,

    #[error("Offset must not exceed 9223372036854775807")]
    OffsetOutOfRange,
}

impl ListAccountsQuery {
    /// `limit` defaults to 100 and is clamped to `1..=100`; `offset` defaults to 0
    /// and must fit a signed 64-bit integer.
    pub fn new(
        role: Option<Role>,
        status: Option<AccountStatus>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Self, ListAccountsQueryError> {
        let filter = match (role, status) {
            (Some(_), Some(_)) => return Err(ListAccountsQueryError::ConflictingFilters),
            (Some(role), None) => AccountFilter::ByRole(role),
            (None, Some(status)) => AccountFilter::ByStatus(status),
            (None, None) => AccountFilter::All,
        };

        let offset = offset.unwrap_or(0);
        if offset > MAX_OFFSET {
            return Err(ListAccountsQueryError::OffsetOutOfRange);
        }

        Ok(Self {
            filter,
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset,
        })
    }

    pub fn filter(&self) -> AccountFilter {
        self.filter
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

// ========================= List Accounts Error =========================
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListAccountsError {
    #[error("Query error: {0}")]
    QueryError(String),
}

#[async_trait]
pub trait IListAccountsUseCase: Send + Sync {
    async fn execute(&self, query: ListAccountsQuery)
        -> Result<Vec<UserAccount>, ListAccountsError>;
}

#[derive(Clone)]
pub struct ListAccountsUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    query: Q,
}

impl<Q> ListAccountsUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

#[async_trait]
impl<Q> IListAccountsUseCase for ListAccountsUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    async fn execute(
        &self,
        query: ListAccountsQuery,
    ) -> Result<Vec<UserAccount>, ListAccountsError> {
        self.query
            .list_accounts(query.filter(), query.limit(), query.offset())
            .await
            .map_err(|e| ListAccountsError::QueryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::fixtures::user_account;
    use crate::tests::support::in_memory::InMemoryUserStore;
    use chrono::{Duration, Utc};

    fn store() -> InMemoryUserStore {
        let now = Utc::now();
        let mut admin = user_account("admin@example.com", Role::Admin, AccountStatus::Active);
        admin.created_at = now - Duration::minutes(3);
        let mut suspended =
            user_account("suspended@example.com", Role::User, AccountStatus::Suspended);
        suspended.created_at = now - Duration::minutes(2);
        let mut user = user_account("user@example.com", Role::User, AccountStatus::Active);
        user.created_at = now - Duration::minutes(1);

        InMemoryUserStore::with_users(vec![admin, suspended, user])
    }

    #[test]
    fn test_query_defaults() {
        let query = ListAccountsQuery::new(None, None, None, None).unwrap();

        assert_eq!(query.filter(), AccountFilter::All);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_query_clamps_limit() {
        assert_eq!(
            ListAccountsQuery::new(None, None, Some(0), None)
                .unwrap()
                .limit(),
            1
        );
        assert_eq!(
            ListAccountsQuery::new(None, None, Some(5000), None)
                .unwrap()
                .limit(),
            MAX_PAGE_SIZE
        );
    }

    #[test]
    fn test_query_offset_bounds() {
        assert_eq!(
            ListAccountsQuery::new(None, None, None, Some(MAX_OFFSET))
                .unwrap()
                .offset(),
            MAX_OFFSET
        );
        assert_eq!(
            ListAccountsQuery::new(None, None, None, Some(u64::MAX)).unwrap_err(),
            ListAccountsQueryError::OffsetOutOfRange
        );
    }

    #[test]
    fn test_query_rejects_role_and_status_together() {
        let result = ListAccountsQuery::new(
            Some(Role::Admin),
            Some(AccountStatus::Active),
            None,
            None,
        );

        assert_eq!(
            result.unwrap_err(),
            ListAccountsQueryError::ConflictingFilters
        );
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let accounts = ListAccountsUseCase::new(store())
            .execute(ListAccountsQuery::new(None, None, None, None).unwrap())
            .await
            .unwrap();

        let emails: Vec<&str> = accounts.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "user@example.com",
                "suspended@example.com",
                "admin@example.com"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let accounts = ListAccountsUseCase::new(store())
            .execute(
                ListAccountsQuery::new(None, Some(AccountStatus::Suspended), None, None).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "suspended@example.com");
    }

    #[tokio::test]
    async fn test_list_by_role_with_offset() {
        let accounts = ListAccountsUseCase::new(store())
            .execute(ListAccountsQuery::new(Some(Role::User), None, Some(10), Some(1)).unwrap())
            .await
            .unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "suspended@example.com");
    }

    #[tokio::test]
    async fn test_list_query_failure() {
        let result = ListAccountsUseCase::new(InMemoryUserStore::failing("timeout"))
            .execute(ListAccountsQuery::new(None, None, None, None).unwrap())
            .await;

        assert!(matches!(result, Err(ListAccountsError::QueryError(_))));
    }
}
