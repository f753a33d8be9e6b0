use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::{normalize_email, Role, UserAccount};
use crate::auth::application::ports::incoming::{PasswordPolicy, PasswordPolicyError};
use crate::auth::application::ports::outgoing::{
    HashError, NewUserAccount, UserQuery, UserRepository, UserRepositoryError,
};
use crate::auth::application::services::hash::PasswordHashingService;
use crate::auth::application::services::{AllocateUsernameError, UsernameAllocator};

// ========================= Register Command =========================
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterUserCommandError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("First name cannot be empty")]
    EmptyFirstName,

    #[error("Last name cannot be empty")]
    EmptyLastName,
}

impl RegisterUserCommand {
    /// `role` defaults to `Role::User` when absent.
    pub fn new(
        email: String,
        password: String,
        first_name: String,
        last_name: String,
        role: Option<Role>,
    ) -> Result<Self, RegisterUserCommandError> {
        let email = normalize_email(&email).ok_or(RegisterUserCommandError::InvalidEmail)?;

        if password.trim().is_empty() {
            return Err(RegisterUserCommandError::EmptyPassword);
        }

        let first_name = first_name.trim().to_string();
        if first_name.is_empty() {
            return Err(RegisterUserCommandError::EmptyFirstName);
        }

        let last_name = last_name.trim().to_string();
        if last_name.is_empty() {
            return Err(RegisterUserCommandError::EmptyLastName);
        }

        Ok(Self {
            email,
            password,
            first_name,
            last_name,
            role: role.unwrap_or_default(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

// ========================= Register Error =========================
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterUserError {
    #[error("{0}")]
    WeakPassword(PasswordPolicyError),

    #[error("Name contains no characters usable in a username")]
    UnusableName,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("No free username could be allocated")]
    UsernameExhausted,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<AllocateUsernameError> for RegisterUserError {
    fn from(err: AllocateUsernameError) -> Self {
        match err {
            AllocateUsernameError::EmptyBase => RegisterUserError::UnusableName,
            AllocateUsernameError::AllocationExhausted { .. } => {
                RegisterUserError::UsernameExhausted
            }
            AllocateUsernameError::QueryError(e) => RegisterUserError::RepositoryError(e),
        }
    }
}

impl From<UserRepositoryError> for RegisterUserError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail => RegisterUserError::DuplicateEmail,
            UserRepositoryError::DuplicateUsername => RegisterUserError::DuplicateUsername,
            other => RegisterUserError::RepositoryError(other.to_string()),
        }
    }
}

// ========================= Register Use Case =========================
#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(&self, command: RegisterUserCommand) -> Result<UserAccount, RegisterUserError>;
}

#[derive(Clone)]
pub struct RegisterUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
    password_hasher: PasswordHashingService,
    password_policy: Arc<dyn PasswordPolicy + Send + Sync>,
    username_allocator: UsernameAllocator,
}

impl<Q, R> RegisterUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        password_hasher: PasswordHashingService,
        password_policy: Arc<dyn PasswordPolicy + Send + Sync>,
        username_allocator: UsernameAllocator,
    ) -> Self {
        Self {
            query,
            repository,
            password_hasher,
            password_policy,
            username_allocator,
        }
    }
}

#[async_trait]
impl<Q, R> IRegisterUserUseCase for RegisterUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, command: RegisterUserCommand) -> Result<UserAccount, RegisterUserError> {
        self.password_policy
            .validate(command.password())
            .map_err(RegisterUserError::WeakPassword)?;

        let username = self
            .username_allocator
            .allocate(command.first_name(), command.last_name(), &self.query)
            .await?;

        let password_hash = self
            .password_hasher
            .hash_password(command.password().to_string())
            .await
            .map_err(|e| match e {
                HashError::PasswordTooLong(limit) => {
                    RegisterUserError::WeakPassword(PasswordPolicyError::TooManyBytes(limit))
                }
                other => RegisterUserError::HashingFailed(other.to_string()),
            })?;

        let user = self
            .repository
            .insert_user(NewUserAccount {
                id: Uuid::new_v4(),
                username,
                email: command.email().to_string(),
                password_hash,
                first_name: command.first_name().to_lowercase(),
                last_name: command.last_name().to_lowercase(),
                role: command.role(),
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "User account created"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::AccountStatus;
    use crate::auth::application::ports::outgoing::{HashError, PasswordHasher};
    use crate::auth::application::services::hash::BcryptHasher;
    use crate::auth::application::services::password::BasicPasswordPolicy;
    use crate::tests::support::fixtures::active_user;
    use crate::tests::support::in_memory::InMemoryUserStore;

    struct MockPasswordHasher;

    impl PasswordHasher for MockPasswordHasher {
        fn hash_password(&self, password: &str) -> Result<String, HashError> {
            Ok(format!("hashed::{}", password))
        }

        fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError> {
            Ok(hash == format!("hashed::{}", password))
        }
    }

    fn use_case(store: &InMemoryUserStore) -> RegisterUserUseCase<InMemoryUserStore, InMemoryUserStore> {
        RegisterUserUseCase::new(
            store.clone(),
            store.clone(),
            PasswordHashingService::with_hasher(MockPasswordHasher),
            Arc::new(BasicPasswordPolicy),
            UsernameAllocator::default(),
        )
    }

    fn command(email: &str, first: &str, last: &str) -> RegisterUserCommand {
        RegisterUserCommand::new(
            email.to_string(),
            "SecurePass123".to_string(),
            first.to_string(),
            last.to_string(),
            None,
        )
        .unwrap()
    }

    // ==================== Command Tests ====================
    #[test]
    fn test_command_normalizes_email_and_defaults_role() {
        let cmd = RegisterUserCommand::new(
            "  John@Example.COM ".to_string(),
            "SecurePass123".to_string(),
            " John ".to_string(),
            "Doe".to_string(),
            None,
        )
        .unwrap();

        assert_eq!(cmd.email(), "john@example.com");
        assert_eq!(cmd.first_name(), "John");
        assert_eq!(cmd.role(), Role::User);
    }

    #[test]
    fn test_command_rejects_invalid_fields() {
        let build = |email: &str, password: &str, first: &str, last: &str| {
            RegisterUserCommand::new(
                email.to_string(),
                password.to_string(),
                first.to_string(),
                last.to_string(),
                None,
            )
        };

        assert_eq!(
            build("nope", "SecurePass123", "John", "Doe").unwrap_err(),
            RegisterUserCommandError::InvalidEmail
        );
        assert_eq!(
            build("john@example.com", "   ", "John", "Doe").unwrap_err(),
            RegisterUserCommandError::EmptyPassword
        );
        assert_eq!(
            build("john@example.com", "SecurePass123", "", "Doe").unwrap_err(),
            RegisterUserCommandError::EmptyFirstName
        );
        assert_eq!(
            build("john@example.com", "SecurePass123", "John", " ").unwrap_err(),
            RegisterUserCommandError::EmptyLastName
        );
    }

    // ==================== Use Case Tests ====================
    #[tokio::test]
    async fn test_register_success() {
        let store = InMemoryUserStore::default();

        let user = use_case(&store)
            .execute(command("john@example.com", "John", "Doe"))
            .await
            .unwrap();

        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, "john@example.com");
        assert_eq!(user.first_name, "john");
        assert_eq!(user.password_hash, "hashed::SecurePass123");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_register_with_explicit_role() {
        let store = InMemoryUserStore::default();
        let cmd = RegisterUserCommand::new(
            "root@example.com".to_string(),
            "SecurePass123".to_string(),
            "Root".to_string(),
            "Admin".to_string(),
            Some(Role::Admin),
        )
        .unwrap();

        let user = use_case(&store).execute(cmd).await.unwrap();

        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_register_allocates_suffix_for_same_name() {
        let store = InMemoryUserStore::with_users(vec![active_user("first@example.com")]);

        let user = use_case(&store)
            .execute(command("second@example.com", "John", "Doe"))
            .await
            .unwrap();

        assert_eq!(user.username, "johndoe1");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = InMemoryUserStore::with_users(vec![active_user("john@example.com")]);

        let result = use_case(&store)
            .execute(command("john@example.com", "Jane", "Roe"))
            .await;

        assert_eq!(result.unwrap_err(), RegisterUserError::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let store = InMemoryUserStore::default();
        let cmd = RegisterUserCommand::new(
            "john@example.com".to_string(),
            "short".to_string(),
            "John".to_string(),
            "Doe".to_string(),
            None,
        )
        .unwrap();

        let result = use_case(&store).execute(cmd).await;

        assert_eq!(
            result.unwrap_err(),
            RegisterUserError::WeakPassword(PasswordPolicyError::TooShort(8))
        );
        assert!(store.users().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_password_past_bcrypt_limit() {
        let store = InMemoryUserStore::default();
        let use_case = RegisterUserUseCase::new(
            store.clone(),
            store.clone(),
            PasswordHashingService::with_hasher(BcryptHasher::with_cost(4)),
            Arc::new(BasicPasswordPolicy),
            UsernameAllocator::default(),
        );
        let cmd = RegisterUserCommand::new(
            "john@example.com".to_string(),
            format!("{}RealTail!", "a".repeat(72)),
            "John".to_string(),
            "Doe".to_string(),
            None,
        )
        .unwrap();

        let result = use_case.execute(cmd).await;

        assert_eq!(
            result.unwrap_err(),
            RegisterUserError::WeakPassword(PasswordPolicyError::TooManyBytes(71))
        );
        assert!(store.users().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_unusable_name() {
        let store = InMemoryUserStore::default();

        let result = use_case(&store)
            .execute(command("john@example.com", "!!", "??"))
            .await;

        assert_eq!(result.unwrap_err(), RegisterUserError::UnusableName);
    }

    #[tokio::test]
    async fn test_register_repository_failure() {
        let store = InMemoryUserStore::failing("connection refused");

        let result = use_case(&store)
            .execute(command("john@example.com", "John", "Doe"))
            .await;

        assert!(matches!(result, Err(RegisterUserError::RepositoryError(_))));
    }

    #[test]
    fn test_duplicate_username_maps_from_repository() {
        assert_eq!(
            RegisterUserError::from(UserRepositoryError::DuplicateUsername),
            RegisterUserError::DuplicateUsername
        );
    }
}
