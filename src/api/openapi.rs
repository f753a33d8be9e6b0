use crate::api::schemas::{ErrorDetail, ErrorResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::auth::adapter::incoming::web::routes::{
    AccountEmailRequest, AccountResponse, CreateUserRequest, ListAccountsResponse,
    LoginRequestDto, LoginResponse, LoginUserInfo, PasswordResetRequestedResponse,
    RefreshTokenRequestDto, RefreshTokenResponseBody, RegisterUserResponse,
    RequestPasswordResetDto, ResetPasswordForm, UpdateProfilePictureRequest,
    UpdateProfileRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account Service API",
        version = "1.0.0",
        description = "Registration, login, token refresh, password reset and account administration",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    paths(
        // User endpoints
        crate::auth::adapter::incoming::web::routes::register_user_handler,
        crate::auth::adapter::incoming::web::routes::login_user_handler,
        crate::auth::adapter::incoming::web::routes::refresh_token_handler,
        crate::auth::adapter::incoming::web::routes::update_profile_handler,
        crate::auth::adapter::incoming::web::routes::update_profile_picture_handler,
        crate::auth::adapter::incoming::web::routes::request_password_reset_handler,
        crate::auth::adapter::incoming::web::routes::reset_password_form_handler,
        crate::auth::adapter::incoming::web::routes::reset_password_handler,

        // Admin endpoints
        crate::auth::adapter::incoming::web::routes::promote_admin_handler,
        crate::auth::adapter::incoming::web::routes::promote_super_admin_handler,
        crate::auth::adapter::incoming::web::routes::demote_super_admin_to_admin_handler,
        crate::auth::adapter::incoming::web::routes::demote_super_admin_to_user_handler,
        crate::auth::adapter::incoming::web::routes::demote_admin_to_user_handler,
        crate::auth::adapter::incoming::web::routes::suspend_user_handler,
        crate::auth::adapter::incoming::web::routes::recover_user_handler,
        crate::auth::adapter::incoming::web::routes::delete_user_handler,
        crate::auth::adapter::incoming::web::routes::list_accounts_handler,
    ),
    components(
        schemas(
            // Response wrappers
            ErrorResponse,
            ErrorDetail,

            // User DTOs
            AccountResponse,
            CreateUserRequest,
            RegisterUserResponse,
            LoginRequestDto,
            LoginResponse,
            LoginUserInfo,
            RefreshTokenRequestDto,
            RefreshTokenResponseBody,
            UpdateProfileRequest,
            UpdateProfilePictureRequest,
            RequestPasswordResetDto,
            PasswordResetRequestedResponse,
            ResetPasswordForm,

            // Admin DTOs
            AccountEmailRequest,
            ListAccountsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login and self-service endpoints"),
        (name = "admin", description = "Account administration, admin or superadmin only"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/users/login"))
                        .build(),
                ),
            )
        }
    }
}
