use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

use crate::auth::application::domain::{normalize_email, AccountStatus, Role};
use crate::auth::application::ports::outgoing::{
    RefreshTokenRepository, TokenProvider, TokenSubject, UserQuery, UserRepository,
};
use crate::auth::application::services::hash::PasswordHashingService;
use uuid::Uuid;

// ========================= Login Request =========================
/// Validated login request - can be deserialized directly from JSON
#[derive(Debug, Clone)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginRequestError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Password cannot be empty")]
    EmptyPassword,
}

impl LoginRequest {
    pub fn new(email: String, password: String) -> Result<Self, LoginRequestError> {
        if email.trim().is_empty() {
            return Err(LoginRequestError::EmptyEmail);
        }
        let email = normalize_email(&email).ok_or(LoginRequestError::InvalidEmailFormat)?;

        if password.is_empty() {
            return Err(LoginRequestError::EmptyPassword);
        }

        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl<'de> Deserialize<'de> for LoginRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LoginRequestHelper {
            email: String,
            password: String,
        }

        let helper = LoginRequestHelper::deserialize(deserializer)?;
        LoginRequest::new(helper.email, helper.password).map_err(serde::de::Error::custom)
    }
}

// ====================== Login Error =============================
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User account is suspended")]
    AccountSuspended,

    #[error("User account has been deleted")]
    AccountDeleted,

    #[error("Password verification failed: {0}")]
    PasswordVerificationFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

// ============================ Login Response =================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUserResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

// ============================ Login User Use Case =============================
#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<LoginUserResponse, LoginError>;
}

pub struct LoginUserUseCase<Q, R, T>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
    T: RefreshTokenRepository + Send + Sync,
{
    query: Q,
    repository: R,
    refresh_tokens: T,
    password_hasher: PasswordHashingService,
    token_provider: Arc<dyn TokenProvider + Send + Sync>,
}

impl<Q, R, T> LoginUserUseCase<Q, R, T>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
    T: RefreshTokenRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        refresh_tokens: T,
        password_hasher: PasswordHashingService,
        token_provider: Arc<dyn TokenProvider + Send + Sync>,
    ) -> Self {
        Self {
            query,
            repository,
            refresh_tokens,
            password_hasher,
            token_provider,
        }
    }
}

#[async_trait]
impl<Q, R, T> ILoginUserUseCase for LoginUserUseCase<Q, R, T>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
    T: RefreshTokenRepository + Send + Sync,
{
    async fn execute(&self, request: LoginRequest) -> Result<LoginUserResponse, LoginError> {
        // Unknown email is reported separately from a wrong password.
        let user = self
            .query
            .find_by_email(request.email())
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?
            .ok_or(LoginError::UserNotFound)?;

        let is_valid = self
            .password_hasher
            .verify_password(request.password().to_string(), user.password_hash.clone())
            .await
            .map_err(|e| LoginError::PasswordVerificationFailed(e.to_string()))?;

        if !is_valid {
            return Err(LoginError::InvalidCredentials);
        }

        match user.status {
            AccountStatus::Active => {}
            AccountStatus::Suspended => return Err(LoginError::AccountSuspended),
            AccountStatus::Deleted => return Err(LoginError::AccountDeleted),
        }

        let pair = self
            .token_provider
            .issue_token_pair(&TokenSubject::from(&user))
            .map_err(|e| LoginError::TokenGenerationFailed(e.to_string()))?;

        self.refresh_tokens
            .insert_refresh_token(user.id, pair.refresh_token.clone(), pair.refresh_expires_at)
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?;

        if let Err(e) = self.repository.update_last_login(user.id, Utc::now()).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to record last login");
        }

        Ok(LoginUserResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: UserInfo {
                id: user.id,
                username: user.username,
                email: user.email,
                role: user.role,
            },
        })
    }
}
