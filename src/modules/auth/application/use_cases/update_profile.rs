use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::application::domain::{normalize_email, UserAccount};
use crate::auth::application::ports::outgoing::{
    ProfileChanges, UserRepository, UserRepositoryError,
};

/// Day-month-year, e.g. `31-12-1990`.
pub const DATE_OF_BIRTH_FORMAT: &str = "%d-%m-%Y";

// ========================= Update Profile Command =========================
/// Profile changes on behalf of an authenticated user. Blank fields are
/// treated as absent and leave the stored value unchanged.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    user_id: Uuid,
    changes: ProfileChanges,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateProfileCommandError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid date of birth '{0}', expected DD-MM-YYYY")]
    InvalidDateOfBirth(String),

    #[error("No profile fields to update")]
    NothingToUpdate,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileFields {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UpdateProfileCommand {
    pub fn new(
        user_id: Uuid,
        fields: UpdateProfileFields,
    ) -> Result<Self, UpdateProfileCommandError> {
        let email = match non_blank(fields.email) {
            Some(raw) => {
                Some(normalize_email(&raw).ok_or(UpdateProfileCommandError::InvalidEmail)?)
            }
            None => None,
        };

        let date_of_birth = match non_blank(fields.date_of_birth) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, DATE_OF_BIRTH_FORMAT)
                    .map_err(|_| UpdateProfileCommandError::InvalidDateOfBirth(raw.clone()))?,
            ),
            None => None,
        };

        let changes = ProfileChanges {
            email,
            first_name: non_blank(fields.first_name).map(|n| n.to_lowercase()),
            last_name: non_blank(fields.last_name).map(|n| n.to_lowercase()),
            phone_number: non_blank(fields.phone_number),
            gender: non_blank(fields.gender),
            date_of_birth,
        };

        if changes.is_empty() {
            return Err(UpdateProfileCommandError::NothingToUpdate);
        }

        Ok(Self { user_id, changes })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn changes(&self) -> &ProfileChanges {
        &self.changes
    }
}

// ========================= Update Profile Error =========================
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum UpdateProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<UserRepositoryError> for UpdateProfileError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UserNotFound => UpdateProfileError::UserNotFound,
            UserRepositoryError::DuplicateEmail => UpdateProfileError::DuplicateEmail,
            other => UpdateProfileError::RepositoryError(other.to_string()),
        }
    }
}

#[async_trait]
pub trait IUpdateProfileUseCase: Send + Sync {
    async fn execute(&self, command: UpdateProfileCommand)
        -> Result<UserAccount, UpdateProfileError>;
}

#[derive(Clone)]
pub struct UpdateProfileUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    repository: R,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IUpdateProfileUseCase for UpdateProfileUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        command: UpdateProfileCommand,
    ) -> Result<UserAccount, UpdateProfileError> {
        let user = self
            .repository
            .update_profile(command.user_id(), command.changes().clone())
            .await?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}
