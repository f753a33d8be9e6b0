use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use rand_core::OsRng;

use crate::auth::application::ports::outgoing::{HashError, PasswordHasher};

pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    salt_override: Option<SaltString>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            salt_override: None,
        }
    }

    #[cfg(test)]
    pub fn with_salt(salt: SaltString) -> Self {
        Self {
            argon2: Argon2::default(),
            salt_override: Some(salt),
        }
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let salt = match &self.salt_override {
            Some(s) => s.clone(),
            None => SaltString::generate(&mut OsRng),
        };

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::HashFailed(e.to_string()))
    }

    fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, HashError> {
        let parsed_hash = PasswordHash::new(hashed).map_err(|_| HashError::MalformedHash)?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(_) => Err(HashError::MalformedHash),
        }
    }
}
