use super::account_response::AccountResponse;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::domain::Role;
use crate::auth::application::use_cases::register_user::{
    RegisterUserCommand, RegisterUserError,
};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Request body for user registration
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Email address
    #[schema(example = "john@example.com")]
    pub email: String,

    /// Password (8 to 128 characters)
    #[schema(example = "SecurePass123!")]
    pub password: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    /// Initial role, `user` when omitted
    #[schema(value_type = Option<String>, example = "user")]
    #[serde(default)]
    pub user_role: Option<Role>,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterUserResponse {
    #[schema(example = "User registered successfully")]
    message: String,

    /// Created account
    user: AccountResponse,
}

fn map_register_error(err: RegisterUserError, email: &str) -> HttpResponse {
    match &err {
        RegisterUserError::WeakPassword(policy) => {
            warn!(email = %email, error = %policy, "Registration rejected: weak password");
            ApiResponse::bad_request("WEAK_PASSWORD", &policy.to_string())
        }

        RegisterUserError::UnusableName => {
            warn!(email = %email, "Registration rejected: unusable name");
            ApiResponse::bad_request("INVALID_NAME", &err.to_string())
        }

        RegisterUserError::DuplicateEmail => {
            warn!(email = %email, "Registration rejected: email already registered");
            ApiResponse::conflict("EMAIL_ALREADY_EXISTS", &err.to_string())
        }

        RegisterUserError::DuplicateUsername => {
            warn!(email = %email, "Registration rejected: username collision");
            ApiResponse::conflict("USERNAME_ALREADY_EXISTS", &err.to_string())
        }

        RegisterUserError::UsernameExhausted => {
            warn!(email = %email, "Registration rejected: username space exhausted");
            ApiResponse::conflict("USERNAME_EXHAUSTED", &err.to_string())
        }

        RegisterUserError::HashingFailed(e) => {
            error!(email = %email, error = %e, "Password hashing failed during registration");
            ApiResponse::internal_error()
        }

        RegisterUserError::RepositoryError(e) => {
            error!(email = %email, error = %e, "Repository failure during registration");
            ApiResponse::internal_error()
        }
    }
}

/// Register a new account
///
/// Creates an active account with a username derived from the first and last name.
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (
            status = 201,
            description = "Account created",
            body = inline(SuccessResponse<RegisterUserResponse>)
        ),
        (
            status = 400,
            description = "Invalid input or weak password",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "WEAK_PASSWORD",
                    "message": "Password must be at least 8 characters"
                }
            })
        ),
        (
            status = 409,
            description = "Email or username already taken",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "EMAIL_ALREADY_EXISTS",
                    "message": "Email is already registered"
                }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/users/register")]
pub async fn register_user_handler(
    req: web::Json<CreateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let email = dto.email.clone();

    info!(email = %email, "Registration attempt");

    let command = match RegisterUserCommand::new(
        dto.email,
        dto.password,
        dto.first_name,
        dto.last_name,
        dto.user_role,
    ) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!(email = %email, error = %e, "Invalid registration input");
            return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string());
        }
    };

    match data.register_user_use_case.execute(command).await {
        Ok(account) => {
            info!(
                user_id = %account.id,
                username = %account.username,
                role = %account.role,
                "User registered"
            );
            ApiResponse::created(RegisterUserResponse {
                message: "User registered successfully".to_string(),
                user: AccountResponse::from(account),
            })
        }
        Err(err) => map_register_error(err, &email),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::UserAccount;
    use crate::auth::application::ports::incoming::PasswordPolicyError;
    use crate::auth::application::use_cases::register_user::IRegisterUserUseCase;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::fixtures::user_account;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct MockRegisterSuccess {
        received: Arc<Mutex<Option<RegisterUserCommand>>>,
    }

    #[async_trait]
    impl IRegisterUserUseCase for MockRegisterSuccess {
        async fn execute(
            &self,
            command: RegisterUserCommand,
        ) -> Result<UserAccount, RegisterUserError> {
            let account = user_account(
                command.email(),
                command.role(),
                crate::auth::application::domain::AccountStatus::Active,
            );
            *self.received.lock().unwrap() = Some(command);
            Ok(account)
        }
    }

    struct MockRegisterFailure(RegisterUserError);

    #[async_trait]
    impl IRegisterUserUseCase for MockRegisterFailure {
        async fn execute(
            &self,
            _command: RegisterUserCommand,
        ) -> Result<UserAccount, RegisterUserError> {
            Err(self.0.clone())
        }
    }

    fn valid_body() -> serde_json::Value {
        serde_json::json!({
            "email": "John@Example.com",
            "password": "SecurePass123!",
            "first_name": "John",
            "last_name": "Doe"
        })
    }

    async fn call_with_failure(err: RegisterUserError) -> (u16, serde_json::Value) {
        let app_state = TestAppStateBuilder::default()
            .with_register_user(MockRegisterFailure(err))
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(register_user_handler))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_register_user_success() {
        let received = Arc::new(Mutex::new(None));
        let app_state = TestAppStateBuilder::default()
            .with_register_user(MockRegisterSuccess {
                received: received.clone(),
            })
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(register_user_handler))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["user"]["email"], "john@example.com");
        assert_eq!(body["data"]["user"]["role"], "user");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let command = received.lock().unwrap().clone().unwrap();
        assert_eq!(command.email(), "john@example.com");
        assert_eq!(command.role(), Role::User);
    }

    #[actix_web::test]
    async fn test_register_user_with_explicit_role() {
        let received = Arc::new(Mutex::new(None));
        let app_state = TestAppStateBuilder::default()
            .with_register_user(MockRegisterSuccess {
                received: received.clone(),
            })
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(register_user_handler))
                .await;

        let mut body = valid_body();
        body["user_role"] = serde_json::json!("admin");
        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let command = received.lock().unwrap().clone().unwrap();
        assert_eq!(command.role(), Role::Admin);
    }

    #[actix_web::test]
    async fn test_register_user_invalid_email() {
        let app_state = TestAppStateBuilder::default().build();
        let app =
            test::init_service(App::new().app_data(app_state).service(register_user_handler))
                .await;

        let mut body = valid_body();
        body["email"] = serde_json::json!("not-an-email");
        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_register_user_weak_password() {
        let (status, body) =
            call_with_failure(RegisterUserError::WeakPassword(PasswordPolicyError::TooShort(8)))
                .await;

        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "WEAK_PASSWORD");
        assert_eq!(
            body["error"]["message"],
            "Password must be at least 8 characters"
        );
    }

    #[actix_web::test]
    async fn test_register_user_duplicate_email() {
        let (status, body) = call_with_failure(RegisterUserError::DuplicateEmail).await;

        assert_eq!(status, 409);
        assert_eq!(body["error"]["code"], "EMAIL_ALREADY_EXISTS");
    }

    #[actix_web::test]
    async fn test_register_user_duplicate_username() {
        let (status, body) = call_with_failure(RegisterUserError::DuplicateUsername).await;

        assert_eq!(status, 409);
        assert_eq!(body["error"]["code"], "USERNAME_ALREADY_EXISTS");
    }

    #[actix_web::test]
    async fn test_register_user_repository_error_is_hidden() {
        let (status, body) = call_with_failure(RegisterUserError::RepositoryError(
            "connection refused".to_string(),
        ))
        .await;

        assert_eq!(status, 500);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("connection refused"));
    }
}
