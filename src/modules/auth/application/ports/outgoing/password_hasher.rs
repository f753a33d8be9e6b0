#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("Password hashing failed: {0}")]
    HashFailed(String),

    #[error("Password exceeds the {0}-byte limit of the hasher")]
    PasswordTooLong(usize),

    #[error("Stored password hash is malformed")]
    MalformedHash,

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

/// Salted, self-describing password hashing. Implementations are CPU bound
/// and are driven through `PasswordHashingService`, which moves them off the
/// async executor.
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, HashError>;

    /// `Ok(false)` on mismatch; `Err(MalformedHash)` when `hash` cannot be parsed.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
