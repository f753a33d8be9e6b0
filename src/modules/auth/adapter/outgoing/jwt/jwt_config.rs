use std::env;
use std::fmt;

pub const MIN_SECRET_LENGTH: usize = 32;
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86_400;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 7_776_000;
pub const DEFAULT_RESET_TOKEN_EXPIRY: i64 = 900;
/// Ten years.
pub const MAX_TOKEN_EXPIRY: i64 = 315_360_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtConfigError {
    #[error("{0} must be set")]
    MissingSecret(&'static str),

    #[error("{0} must be at least 32 characters long for HS256")]
    SecretTooShort(&'static str),

    #[error("Access, refresh and reset secrets must all differ")]
    SharedSecret,

    #[error("{0} must be a positive number of seconds, at most ten years")]
    InvalidExpiry(&'static str),

    #[error("JWT_REFRESH_EXPIRY must be greater than JWT_ACCESS_EXPIRY")]
    RefreshNotLongerThanAccess,
}

/// Secrets and lifetimes for the three token domains. Expiries are seconds.
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub reset_secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub reset_token_expiry: i64,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("reset_secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("reset_token_expiry", &self.reset_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Builds a config with default lifetimes and validates the secrets.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        reset_secret: impl Into<String>,
    ) -> Result<Self, JwtConfigError> {
        let config = Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            reset_secret: reset_secret.into(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
            reset_token_expiry: DEFAULT_RESET_TOKEN_EXPIRY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load JWT configuration from environment variables
    pub fn from_env() -> Result<Self, JwtConfigError> {
        let config = Self {
            access_secret: Self::read_secret("JWT_ACCESS_SECRET")?,
            refresh_secret: Self::read_secret("JWT_REFRESH_SECRET")?,
            reset_secret: Self::read_secret("JWT_RESET_SECRET")?,
            access_token_expiry: Self::parse_expiry(
                "JWT_ACCESS_EXPIRY",
                DEFAULT_ACCESS_TOKEN_EXPIRY,
            )?,
            refresh_token_expiry: Self::parse_expiry(
                "JWT_REFRESH_EXPIRY",
                DEFAULT_REFRESH_TOKEN_EXPIRY,
            )?,
            reset_token_expiry: Self::parse_expiry("JWT_RESET_EXPIRY", DEFAULT_RESET_TOKEN_EXPIRY)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), JwtConfigError> {
        let secrets = [
            ("JWT_ACCESS_SECRET", &self.access_secret),
            ("JWT_REFRESH_SECRET", &self.refresh_secret),
            ("JWT_RESET_SECRET", &self.reset_secret),
        ];

        for (name, secret) in secrets {
            if secret.len() < MIN_SECRET_LENGTH {
                return Err(JwtConfigError::SecretTooShort(name));
            }
        }

        if self.access_secret == self.refresh_secret
            || self.access_secret == self.reset_secret
            || self.refresh_secret == self.reset_secret
        {
            return Err(JwtConfigError::SharedSecret);
        }

        let expiries = [
            ("JWT_ACCESS_EXPIRY", self.access_token_expiry),
            ("JWT_REFRESH_EXPIRY", self.refresh_token_expiry),
            ("JWT_RESET_EXPIRY", self.reset_token_expiry),
        ];

        for (name, expiry) in expiries {
            if !(1..=MAX_TOKEN_EXPIRY).contains(&expiry) {
                return Err(JwtConfigError::InvalidExpiry(name));
            }
        }

        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(JwtConfigError::RefreshNotLongerThanAccess);
        }

        Ok(())
    }

    fn read_secret(key: &'static str) -> Result<String, JwtConfigError> {
        env::var(key)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(JwtConfigError::MissingSecret(key))
    }

    fn parse_expiry(key: &'static str, default: i64) -> Result<i64, JwtConfigError> {
        match env::var(key) {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| JwtConfigError::InvalidExpiry(key)),
            Err(_) => Ok(default),
        }
    }
}
