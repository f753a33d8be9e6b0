use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::UserAccount;
use crate::auth::application::ports::outgoing::{UserRepository, UserRepositoryError};

#[derive(Debug, Clone)]
pub struct UpdateProfilePictureCommand {
    user_id: Uuid,
    profile_picture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateProfilePictureCommandError {
    #[error("Profile picture cannot be empty")]
    EmptyPicture,
}

impl UpdateProfilePictureCommand {
    pub fn new(
        user_id: Uuid,
        profile_picture: String,
    ) -> Result<Self, UpdateProfilePictureCommandError> {
        let profile_picture = profile_picture.trim();
        if profile_picture.is_empty() {
            return Err(UpdateProfilePictureCommandError::EmptyPicture);
        }

        Ok(Self {
            user_id,
            profile_picture: profile_picture.to_string(),
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn profile_picture(&self) -> &str {
        &self.profile_picture
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateProfilePictureError {
    #[error("User not found")]
    UserNotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<UserRepositoryError> for UpdateProfilePictureError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UserNotFound => UpdateProfilePictureError::UserNotFound,
            other => UpdateProfilePictureError::RepositoryError(other.to_string()),
        }
    }
}

#[async_trait]
pub trait IUpdateProfilePictureUseCase: Send + Sync {
    async fn execute(
        &self,
        command: UpdateProfilePictureCommand,
    ) -> Result<UserAccount, UpdateProfilePictureError>;
}

#[derive(Clone)]
pub struct UpdateProfilePictureUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    repository: R,
}

impl<R> UpdateProfilePictureUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IUpdateProfilePictureUseCase for UpdateProfilePictureUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        command: UpdateProfilePictureCommand,
    ) -> Result<UserAccount, UpdateProfilePictureError> {
        let user = self
            .repository
            .update_profile_picture(command.user_id(), command.profile_picture().to_string())
            .await?;

        Ok(user)
    }
}
