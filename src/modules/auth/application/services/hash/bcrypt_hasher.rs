use bcrypt::{non_truncating_hash, non_truncating_verify, BcryptError, DEFAULT_COST};

use crate::auth::application::ports::outgoing::{HashError, PasswordHasher};

/// Longest password bcrypt accepts without truncating (72 bytes including the NUL terminator).
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 71;

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash_password(&self, password: &str) -> Result<String, HashError> {
        non_truncating_hash(password, self.cost).map_err(|e| match e {
            BcryptError::Truncation(_) => HashError::PasswordTooLong(BCRYPT_MAX_PASSWORD_BYTES),
            other => HashError::HashFailed(other.to_string()),
        })
    }

    fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, HashError> {
        match non_truncating_verify(password, hashed) {
            Ok(matches) => Ok(matches),
            // Nothing this long was ever stored, so it cannot match.
            Err(BcryptError::Truncation(_)) => Ok(false),
            Err(_) => Err(HashError::MalformedHash),
        }
    }
}
