use crate::auth::application::ports::incoming::password_policy::{
    PasswordPolicy, PasswordPolicyError,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

pub struct BasicPasswordPolicy;

impl PasswordPolicy for BasicPasswordPolicy {
    fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        let length = password.chars().count();

        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH));
        }

        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong(MAX_PASSWORD_LENGTH));
        }

        Ok(())
    }
}
