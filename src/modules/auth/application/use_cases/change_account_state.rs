use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::{
    normalize_email, AccountTransition, InvalidTransition, TransitionEffect, UserAccount,
};
use crate::auth::application::ports::outgoing::{UserQuery, UserRepository, UserRepositoryError};

// ========================= Change Account State Command =========================
#[derive(Debug, Clone)]
pub struct ChangeAccountStateCommand {
    actor_id: Uuid,
    target_email: String,
    transition: AccountTransition,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeAccountStateCommandError {
    #[error("Invalid email format")]
    InvalidEmail,
}

impl ChangeAccountStateCommand {
    pub fn new(
        actor_id: Uuid,
        target_email: String,
        transition: AccountTransition,
    ) -> Result<Self, ChangeAccountStateCommandError> {
        let target_email =
            normalize_email(&target_email).ok_or(ChangeAccountStateCommandError::InvalidEmail)?;

        Ok(Self {
            actor_id,
            target_email,
            transition,
        })
    }

    pub fn actor_id(&self) -> Uuid {
        self.actor_id
    }

    pub fn target_email(&self) -> &str {
        &self.target_email
    }

    pub fn transition(&self) -> AccountTransition {
        self.transition
    }
}

// ========================= Change Account State Error =========================
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeAccountStateError {
    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<UserRepositoryError> for ChangeAccountStateError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UserNotFound => ChangeAccountStateError::UserNotFound,
            other => ChangeAccountStateError::RepositoryError(other.to_string()),
        }
    }
}

// ========================= Change Account State Use Case =========================
#[async_trait]
pub trait IChangeAccountStateUseCase: Send + Sync {
    async fn execute(
        &self,
        command: ChangeAccountStateCommand,
    ) -> Result<UserAccount, ChangeAccountStateError>;
}

/// Reads the target's current state, checks the transition, then writes the
/// one field it changes. The read and the write are separate statements.
#[derive(Clone)]
pub struct ChangeAccountStateUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
}

impl<Q, R> ChangeAccountStateUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(query: Q, repository: R) -> Self {
        Self { query, repository }
    }
}

#[async_trait]
impl<Q, R> IChangeAccountStateUseCase for ChangeAccountStateUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        command: ChangeAccountStateCommand,
    ) -> Result<UserAccount, ChangeAccountStateError> {
        let target = self
            .query
            .find_by_email(command.target_email())
            .await
            .map_err(|e| ChangeAccountStateError::RepositoryError(e.to_string()))?
            .ok_or(ChangeAccountStateError::UserNotFound)?;

        let effect = command.transition().apply(target.state()).map_err(|e| {
            tracing::warn!(
                actor_id = %command.actor_id(),
                target_id = %target.id,
                transition = %e.attempted,
                current = %e.current,
                "Rejected account transition"
            );
            e
        })?;

        let updated = match effect {
            TransitionEffect::SetRole(role) => self.repository.update_role(target.id, role).await?,
            TransitionEffect::SetStatus(status) => {
                self.repository.update_status(target.id, status).await?
            }
        };

        tracing::info!(
            actor_id = %command.actor_id(),
            target_id = %updated.id,
            transition = %command.transition(),
            role = %updated.role,
            status = %updated.status,
            "Account state changed"
        );

        Ok(updated)
    }
}
