use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::refresh_token::{RefreshTokenError, RefreshTokenRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RefreshTokenRequestDto {
    /// Refresh token issued at login
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
}

#[derive(Serialize, ToSchema)]
pub struct RefreshTokenResponseBody {
    /// Newly issued access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    access_token: String,

    /// The refresh token that was presented
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    refresh_token: String,
}

/// Refresh access token
///
/// Exchanges a valid refresh token for a new access token. The refresh token is returned unchanged.
#[utoipa::path(
    post,
    path = "/api/users/refresh",
    tag = "users",
    request_body = RefreshTokenRequestDto,
    responses(
        (
            status = 200,
            description = "New access token issued",
            body = inline(SuccessResponse<RefreshTokenResponseBody>)
        ),
        (
            status = 401,
            description = "Refresh token expired or invalid",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "TOKEN_EXPIRED",
                    "message": "Refresh token has expired. Please login again."
                }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/users/refresh")]
pub async fn refresh_token_handler(
    req: web::Json<RefreshTokenRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Token refresh attempt");

    let request = match RefreshTokenRequest::new(req.into_inner().refresh_token) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.refresh_token_use_case.execute(request).await {
        Ok(response) => {
            info!("Token refreshed successfully");
            ApiResponse::success(RefreshTokenResponseBody {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            })
        }

        Err(RefreshTokenError::TokenExpired) => {
            warn!("Token refresh failed: token expired");
            ApiResponse::unauthorized(
                "TOKEN_EXPIRED",
                "Refresh token has expired. Please login again.",
            )
        }

        Err(RefreshTokenError::TokenInvalid) | Err(RefreshTokenError::IncompleteClaims) => {
            warn!("Token refresh failed: invalid token");
            ApiResponse::unauthorized("INVALID_TOKEN", "Invalid refresh token")
        }

        Err(RefreshTokenError::TokenGenerationFailed(ref e)) => {
            error!(error = %e, "Access token generation failed");
            ApiResponse::internal_error()
        }
    }
}
