use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserEmailNotificationError {
    #[error("Email sending failed: {0}")]
    EmailSendingFailed(String),
}

#[async_trait::async_trait]
pub trait UserEmailNotifier: Send + Sync {
    /// Delivers a password-reset link built around `reset_token` to `email`.
    async fn send_password_reset_email(
        &self,
        user_id: Uuid,
        email: &str,
        reset_token: &str,
    ) -> Result<(), UserEmailNotificationError>;
}
