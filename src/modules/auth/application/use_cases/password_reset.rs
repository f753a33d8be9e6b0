use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::normalize_email;
use crate::auth::application::ports::incoming::{PasswordPolicy, PasswordPolicyError};
use crate::auth::application::ports::outgoing::{
    HashError, TokenError, TokenProvider, UserQuery, UserRepository, UserRepositoryError,
};
use crate::auth::application::services::hash::PasswordHashingService;
use crate::email::application::ports::outgoing::UserEmailNotifier;

// ========================= Commands =========================
#[derive(Debug, Clone)]
pub struct RequestPasswordResetCommand {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestPasswordResetCommandError {
    #[error("Invalid email format")]
    InvalidEmail,
}

impl RequestPasswordResetCommand {
    pub fn new(email: String) -> Result<Self, RequestPasswordResetCommandError> {
        let email =
            normalize_email(&email).ok_or(RequestPasswordResetCommandError::InvalidEmail)?;
        Ok(Self { email })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Submitted reset form: the emailed token plus the new password typed twice.
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    token: String,
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetPasswordCommandError {
    #[error("Token is required")]
    EmptyToken,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ResetPasswordCommand {
    pub fn new(
        token: String,
        new_password: String,
        confirm_password: String,
    ) -> Result<Self, ResetPasswordCommandError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ResetPasswordCommandError::EmptyToken);
        }
        if new_password.is_empty() {
            return Err(ResetPasswordCommandError::EmptyPassword);
        }
        if new_password != confirm_password {
            return Err(ResetPasswordCommandError::PasswordMismatch);
        }

        Ok(Self {
            token: token.to_string(),
            new_password,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn new_password(&self) -> &str {
        &self.new_password
    }
}

// ========================= Errors =========================
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordResetError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid reset token")]
    InvalidToken,

    #[error("Reset token has expired")]
    TokenExpired,

    #[error("{0}")]
    WeakPassword(PasswordPolicyError),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Failed to send reset email: {0}")]
    EmailDeliveryFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<TokenError> for PasswordResetError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired => PasswordResetError::TokenExpired,
            TokenError::EncodingError(msg) => PasswordResetError::TokenGenerationFailed(msg),
            _ => PasswordResetError::InvalidToken,
        }
    }
}

impl From<UserRepositoryError> for PasswordResetError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UserNotFound => PasswordResetError::UserNotFound,
            other => PasswordResetError::RepositoryError(other.to_string()),
        }
    }
}

// ========================= Use Case Traits =========================
#[async_trait]
pub trait IRequestPasswordResetUseCase: Send + Sync {
    async fn execute(&self, command: RequestPasswordResetCommand)
        -> Result<(), PasswordResetError>;
}

#[async_trait]
pub trait IVerifyResetTokenUseCase: Send + Sync {
    /// Returns the id of the account the token was issued for.
    async fn execute(&self, token: &str) -> Result<Uuid, PasswordResetError>;
}

#[async_trait]
pub trait IResetPasswordUseCase: Send + Sync {
    async fn execute(&self, command: ResetPasswordCommand) -> Result<(), PasswordResetError>;
}

// ========================= Implementation =========================
/// Backs all three reset steps. Reset tokens are not tracked, so a token
/// stays usable until it expires.
#[derive(Clone)]
pub struct PasswordResetUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
    token_provider: Arc<dyn TokenProvider + Send + Sync>,
    notifier: Arc<dyn UserEmailNotifier + Send + Sync>,
    password_hasher: PasswordHashingService,
    password_policy: Arc<dyn PasswordPolicy + Send + Sync>,
}

impl<Q, R> PasswordResetUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        token_provider: Arc<dyn TokenProvider + Send + Sync>,
        notifier: Arc<dyn UserEmailNotifier + Send + Sync>,
        password_hasher: PasswordHashingService,
        password_policy: Arc<dyn PasswordPolicy + Send + Sync>,
    ) -> Self {
        Self {
            query,
            repository,
            token_provider,
            notifier,
            password_hasher,
            password_policy,
        }
    }
}

#[async_trait]
impl<Q, R> IRequestPasswordResetUseCase for PasswordResetUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        command: RequestPasswordResetCommand,
    ) -> Result<(), PasswordResetError> {
        let user = self
            .query
            .find_by_email(command.email())
            .await
            .map_err(|e| PasswordResetError::RepositoryError(e.to_string()))?
            .ok_or(PasswordResetError::UserNotFound)?;

        let reset_token = self.token_provider.issue_reset_token(user.id)?;

        self.notifier
            .send_password_reset_email(user.id, &user.email, &reset_token)
            .await
            .map_err(|e| PasswordResetError::EmailDeliveryFailed(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }
}

#[async_trait]
impl<Q, R> IVerifyResetTokenUseCase for PasswordResetUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, token: &str) -> Result<Uuid, PasswordResetError> {
        Ok(self.token_provider.verify_reset_token(token)?)
    }
}

#[async_trait]
impl<Q, R> IResetPasswordUseCase for PasswordResetUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, command: ResetPasswordCommand) -> Result<(), PasswordResetError> {
        self.password_policy
            .validate(command.new_password())
            .map_err(PasswordResetError::WeakPassword)?;

        let user_id = self.token_provider.verify_reset_token(command.token())?;

        let password_hash = self
            .password_hasher
            .hash_password(command.new_password().to_string())
            .await
            .map_err(|e| match e {
                HashError::PasswordTooLong(limit) => {
                    PasswordResetError::WeakPassword(PasswordPolicyError::TooManyBytes(limit))
                }
                other => PasswordResetError::HashingFailed(other.to_string()),
            })?;

        self.repository
            .update_password_hash(user_id, password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "Password reset completed");
        Ok(())
    }
}
