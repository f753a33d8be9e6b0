use std::env;
use std::str::FromStr;

use crate::auth::application::services::hash::HashingAlgorithm;
use crate::auth::application::services::username_allocator::DEFAULT_MAX_SUFFIX;

const DEFAULT_SMTP_HOST: &str = "localhost";
const DEFAULT_SMTP_PORT: u16 = 1025;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpSettings {
    /// Authenticated TLS relay.
    Relay {
        server: String,
        username: String,
        password: String,
    },
    /// Plain SMTP without credentials, e.g. a local Mailpit.
    Local { host: String, port: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub run_migrations: bool,
    pub app_base_url: String,
    pub password_hasher: HashingAlgorithm,
    pub username_max_suffix: u32,
    pub email_from: String,
    pub smtp: SmtpSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`. `RUST_ENV=test` selects the local SMTP transport.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let environment = lookup("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let host = required("HOST")?;
        let port = parse_or("PORT", lookup("PORT"), 8080)?;
        let database_url = required("DATABASE_URL")?;
        let run_migrations = parse_or("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), false)?;
        let app_base_url =
            lookup("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", host, port));
        let password_hasher = parse_or(
            "PASSWORD_HASHER",
            lookup("PASSWORD_HASHER"),
            HashingAlgorithm::default(),
        )?;
        let username_max_suffix = parse_or(
            "USERNAME_MAX_SUFFIX",
            lookup("USERNAME_MAX_SUFFIX"),
            DEFAULT_MAX_SUFFIX,
        )?;
        let email_from = required("EMAIL_FROM")?;

        let smtp = if environment == "test" {
            SmtpSettings::Local {
                host: lookup("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: parse_or("SMTP_PORT", lookup("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            }
        } else {
            SmtpSettings::Relay {
                server: required("SMTP_SERVER")?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
            }
        };

        Ok(Self {
            environment,
            host,
            port,
            database_url,
            run_migrations,
            app_base_url,
            password_hasher,
            username_max_suffix,
            email_from,
            smtp,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
