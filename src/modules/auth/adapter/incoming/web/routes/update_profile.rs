use super::account_response::AccountResponse;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::use_cases::update_profile::{
    UpdateProfileCommand, UpdateProfileError, UpdateProfileFields,
};
use crate::auth::application::use_cases::update_profile_picture::{
    UpdateProfilePictureCommand, UpdateProfilePictureError,
};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{put, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Profile fields to change. Omitted or blank fields keep their stored value.
#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateProfileRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: Option<String>,

    #[schema(example = "John")]
    pub first_name: Option<String>,

    #[schema(example = "Doe")]
    pub last_name: Option<String>,

    #[schema(example = "+6281234567890")]
    pub phone_number: Option<String>,

    #[schema(example = "male")]
    pub gender: Option<String>,

    /// Date of birth as DD-MM-YYYY
    #[schema(example = "31-12-1990")]
    pub date_of_birth: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileFields {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            gender: req.gender,
            date_of_birth: req.date_of_birth,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfilePictureRequest {
    /// Location of the uploaded picture
    #[schema(example = "https://cdn.example.com/avatars/johndoe.png")]
    pub profile_picture: String,
}

fn map_update_profile_error(err: UpdateProfileError) -> HttpResponse {
    match err {
        UpdateProfileError::UserNotFound => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        UpdateProfileError::DuplicateEmail => {
            ApiResponse::conflict("EMAIL_ALREADY_EXISTS", "Email is already registered")
        }
        UpdateProfileError::RepositoryError(ref e) => {
            error!(error = %e, "Profile update failed");
            ApiResponse::internal_error()
        }
    }
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/api/users/update",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Invalid field value or nothing to update",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Invalid date of birth '1990-12-31', expected DD-MM-YYYY"
                }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/users/update")]
pub async fn update_profile_handler(
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let command = match UpdateProfileCommand::new(user.user_id, req.into_inner().into()) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!(user_id = %user.user_id, error = %e, "Invalid profile update");
            return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string());
        }
    };

    match data.update_profile_use_case.execute(command).await {
        Ok(account) => {
            info!(user_id = %account.id, "Profile updated");
            ApiResponse::success(AccountResponse::from(account))
        }
        Err(err) => map_update_profile_error(err),
    }
}

/// Update own profile picture
#[utoipa::path(
    put,
    path = "/api/users/update-profile-picture",
    tag = "users",
    request_body = UpdateProfilePictureRequest,
    responses(
        (status = 200, description = "Profile picture updated", body = inline(SuccessResponse<AccountResponse>)),
        (status = 400, description = "Empty picture reference", body = ErrorResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/users/update-profile-picture")]
pub async fn update_profile_picture_handler(
    user: AuthenticatedUser,
    req: web::Json<UpdateProfilePictureRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let command =
        match UpdateProfilePictureCommand::new(user.user_id, req.into_inner().profile_picture) {
            Ok(cmd) => cmd,
            Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
        };

    match data.update_profile_picture_use_case.execute(command).await {
        Ok(account) => {
            info!(user_id = %account.id, "Profile picture updated");
            ApiResponse::success(AccountResponse::from(account))
        }
        Err(UpdateProfilePictureError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(UpdateProfilePictureError::RepositoryError(ref e)) => {
            error!(user_id = %user.user_id, error = %e, "Profile picture update failed");
            ApiResponse::internal_error()
        }
    }
}
