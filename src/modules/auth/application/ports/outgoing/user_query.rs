// application/ports/outgoing/user_query.rs
use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::{AccountStatus, Role, UserAccount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFilter {
    All,
    ByRole(Role),
    ByStatus(AccountStatus),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserAccount>, UserQueryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserQueryError>;
    async fn count_by_username(&self, username: &str) -> Result<u64, UserQueryError>;

    /// Accounts ordered by creation time, newest first.
    async fn list_accounts(
        &self,
        filter: AccountFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<UserAccount>, UserQueryError>;
}
