use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::application::domain::{Role, UserAccount};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Unexpected signing algorithm: {0}")]
    UnexpectedAlgorithm(String),

    #[error("Malformed token")]
    Malformed,

    #[error("Token is missing required claims")]
    IncompleteClaims,

    #[error("Token encoding error: {0}")]
    EncodingError(String),
}

/// Which secret a session token was signed with.
///
/// Reset tokens live in their own domain and are handled by the dedicated
/// `issue_reset_token` / `verify_reset_token` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDomain {
    Access,
    Refresh,
}

impl fmt::Display for TokenDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenDomain::Access => write!(f, "access"),
            TokenDomain::Refresh => write!(f, "refresh"),
        }
    }
}

/// Identity that gets embedded into access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserAccount> for TokenSubject {
    fn from(user: &UserAccount) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<&TokenClaims> for TokenSubject {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            email: claims.email.clone(),
            role: claims.role,
        }
    }
}

/// Claims carried by access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

pub trait TokenProvider: Send + Sync {
    fn issue_access_token(&self, subject: &TokenSubject) -> Result<String, TokenError>;

    fn issue_refresh_token(&self, subject: &TokenSubject)
        -> Result<IssuedRefreshToken, TokenError>;

    /// Issues both session tokens; either both succeed or no token is returned.
    fn issue_token_pair(&self, subject: &TokenSubject) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access_token(subject)?;
        let refresh = self.issue_refresh_token(subject)?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
            refresh_expires_at: refresh.expires_at,
        })
    }

    fn parse_and_validate(&self, token: &str, domain: TokenDomain)
        -> Result<TokenClaims, TokenError>;

    /// Validates a refresh token and mints a new access token for its subject.
    fn refresh_access_token(&self, refresh_token: &str) -> Result<String, TokenError>;

    fn issue_reset_token(&self, user_id: Uuid) -> Result<String, TokenError>;

    fn verify_reset_token(&self, token: &str) -> Result<Uuid, TokenError>;
}
