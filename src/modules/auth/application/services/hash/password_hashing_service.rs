use std::str::FromStr;
use std::sync::Arc;
use tokio::task;

use super::{argon2_hasher::Argon2Hasher, bcrypt_hasher::BcryptHasher};
use crate::auth::application::ports::outgoing::{HashError, PasswordHasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashingAlgorithm {
    Argon2,
    #[default]
    Bcrypt,
}

impl FromStr for HashingAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" => Ok(HashingAlgorithm::Argon2),
            "bcrypt" => Ok(HashingAlgorithm::Bcrypt),
            other => Err(format!("unsupported password hasher '{}'", other)),
        }
    }
}

/// Runs the configured hasher on the blocking pool.
pub struct PasswordHashingService {
    hasher: Arc<dyn PasswordHasher + Send + Sync>,
}

impl Clone for PasswordHashingService {
    fn clone(&self) -> Self {
        Self {
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl PasswordHashingService {
    pub fn new(algorithm: HashingAlgorithm) -> Self {
        let hasher: Arc<dyn PasswordHasher + Send + Sync> = match algorithm {
            HashingAlgorithm::Argon2 => Arc::new(Argon2Hasher::new()),
            HashingAlgorithm::Bcrypt => Arc::new(BcryptHasher::new()),
        };
        Self { hasher }
    }

    pub fn with_hasher<H>(hasher: H) -> Self
    where
        H: PasswordHasher + Send + Sync + 'static,
    {
        Self {
            hasher: Arc::new(hasher),
        }
    }

    pub async fn hash_password(&self, password: String) -> Result<String, HashError> {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| HashError::TaskFailed(e.to_string()))?
    }

    pub async fn verify_password(&self, password: String, hash: String) -> Result<bool, HashError> {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| HashError::TaskFailed(e.to_string()))?
    }
}
