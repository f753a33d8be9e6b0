use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::email::application::ports::outgoing::{
    EmailSender, UserEmailNotificationError, UserEmailNotifier,
};

pub const PASSWORD_RESET_SUBJECT: &str = "Reset your password";

/// Builds user-facing messages and hands them to an `EmailSender`.
#[derive(Clone)]
pub struct UserEmailService {
    sender: Arc<dyn EmailSender + Send + Sync>,
    app_base_url: String,
}

impl fmt::Debug for UserEmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEmailService")
            .field("sender", &"<dyn EmailSender>")
            .field("app_base_url", &self.app_base_url)
            .finish()
    }
}

impl UserEmailService {
    pub fn new(sender: Arc<dyn EmailSender + Send + Sync>, app_base_url: &str) -> Self {
        Self {
            sender,
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn reset_link(&self, reset_token: &str) -> String {
        format!("{}/reset-password?token={}", self.app_base_url, reset_token)
    }

    fn reset_body(&self, reset_token: &str) -> String {
        let link = self.reset_link(reset_token);
        format!(
            "<p>We received a request to reset your password.</p>\
             <p><a href=\"{link}\">Reset password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>"
        )
    }
}

#[async_trait]
impl UserEmailNotifier for UserEmailService {
    async fn send_password_reset_email(
        &self,
        user_id: Uuid,
        email: &str,
        reset_token: &str,
    ) -> Result<(), UserEmailNotificationError> {
        let body = self.reset_body(reset_token);

        match self
            .sender
            .send_email(email, PASSWORD_RESET_SUBJECT, &body)
            .await
        {
            Ok(()) => {
                info!(user_id = %user_id, "Password reset email sent");
                Ok(())
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to send password reset email");
                Err(UserEmailNotificationError::EmailSendingFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::application::ports::outgoing::EmailSendError;
    use mockall::{mock, predicate::*};

    mock! {
        pub EmailSenderMock {}
        #[async_trait]
        impl EmailSender for EmailSenderMock {
            async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailSendError>;
        }
    }

    #[test]
    fn test_reset_link_strips_trailing_slash() {
        let service = UserEmailService::new(
            Arc::new(MockEmailSenderMock::new()),
            "https://accounts.example.com/",
        );

        assert_eq!(
            service.reset_link("abc.def.ghi"),
            "https://accounts.example.com/reset-password?token=abc.def.ghi"
        );
    }

    #[test]
    fn test_debug_hides_sender() {
        let service =
            UserEmailService::new(Arc::new(MockEmailSenderMock::new()), "http://localhost:8080");

        assert_eq!(
            format!("{:?}", service),
            "UserEmailService { sender: \"<dyn EmailSender>\", app_base_url: \"http://localhost:8080\" }"
        );
    }

    #[tokio::test]
    async fn test_send_password_reset_email() {
        let mut sender = MockEmailSenderMock::new();
        sender
            .expect_send_email()
            .with(
                eq("john@example.com"),
                eq(PASSWORD_RESET_SUBJECT),
                function(|body: &str| {
                    body.contains("http://localhost:8080/reset-password?token=reset-token")
                }),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = UserEmailService::new(Arc::new(sender), "http://localhost:8080");

        let result = service
            .send_password_reset_email(Uuid::new_v4(), "john@example.com", "reset-token")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_password_reset_email_failure() {
        let mut sender = MockEmailSenderMock::new();
        sender
            .expect_send_email()
            .times(1)
            .returning(|_, _, _| Err(EmailSendError::TransportFailed("timeout".to_string())));

        let service = UserEmailService::new(Arc::new(sender), "http://localhost:8080");

        let result = service
            .send_password_reset_email(Uuid::new_v4(), "john@example.com", "reset-token")
            .await;

        assert_eq!(
            result,
            Err(UserEmailNotificationError::EmailSendingFailed(
                "Transport failure: timeout".to_string()
            ))
        );
    }
}
