use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::use_cases::password_reset::{
    PasswordResetError, RequestPasswordResetCommand, ResetPasswordCommand,
};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::http::StatusCode;
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct RequestPasswordResetDto {
    /// Address of the account to reset
    #[schema(example = "john@example.com")]
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct PasswordResetRequestedResponse {
    #[schema(example = "Password reset email sent")]
    message: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResetTokenQuery {
    /// Token from the reset email
    pub token: Option<String>,
}

/// Fields posted by the reset form.
#[derive(Deserialize, ToSchema)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn html_page(status: StatusCode, title: &str, body: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html>\
             <html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
             <body><h1>{title}</h1>{body}</body></html>"
        ))
}

fn message_page(status: StatusCode, title: &str, message: &str) -> HttpResponse {
    html_page(status, title, &format!("<p>{}</p>", escape_html(message)))
}

fn reset_form(token: &str) -> HttpResponse {
    let form = format!(
        "<form method=\"post\" action=\"/reset-password\">\
         <input type=\"hidden\" name=\"token\" value=\"{}\">\
         <label>New password <input type=\"password\" name=\"password\" required></label>\
         <label>Confirm password <input type=\"password\" name=\"confirm_password\" required></label>\
         <button type=\"submit\">Reset password</button>\
         </form>",
        escape_html(token)
    );
    html_page(StatusCode::OK, "Reset your password", &form)
}

fn reset_error_page(err: &PasswordResetError) -> HttpResponse {
    match err {
        PasswordResetError::InvalidToken | PasswordResetError::TokenExpired => {
            warn!(error = %err, "Reset token rejected");
            message_page(
                StatusCode::UNAUTHORIZED,
                "Link no longer valid",
                "This password reset link is invalid or has expired. Please request a new one.",
            )
        }
        PasswordResetError::WeakPassword(policy) => {
            message_page(StatusCode::BAD_REQUEST, "Password rejected", &policy.to_string())
        }
        PasswordResetError::UserNotFound => {
            message_page(StatusCode::NOT_FOUND, "Account not found", "User not found")
        }
        other => {
            error!(error = %other, "Password reset failed");
            message_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred",
            )
        }
    }
}

/// Request a password reset email
///
/// Sends a reset link for the given account. The caller must be signed in.
#[utoipa::path(
    put,
    path = "/api/users/reset-password",
    tag = "users",
    request_body = RequestPasswordResetDto,
    responses(
        (
            status = 200,
            description = "Reset email sent",
            body = inline(SuccessResponse<PasswordResetRequestedResponse>)
        ),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Token or email delivery failure", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/users/reset-password")]
pub async fn request_password_reset_handler(
    user: AuthenticatedUser,
    req: web::Json<RequestPasswordResetDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let command = match RequestPasswordResetCommand::new(req.into_inner().email) {
        Ok(cmd) => cmd,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    info!(requested_by = %user.user_id, email = %command.email(), "Password reset requested");

    match data.request_password_reset_use_case.execute(command).await {
        Ok(()) => ApiResponse::success(PasswordResetRequestedResponse {
            message: "Password reset email sent".to_string(),
        }),
        Err(PasswordResetError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(err) => {
            error!(requested_by = %user.user_id, error = %err, "Password reset request failed");
            ApiResponse::internal_error()
        }
    }
}

/// Password reset form
///
/// Verifies the emailed token and renders an HTML form for the new password.
#[utoipa::path(
    get,
    path = "/reset-password",
    tag = "users",
    params(ResetTokenQuery),
    responses(
        (status = 200, description = "Reset form", body = String, content_type = "text/html"),
        (status = 400, description = "Token missing", body = String, content_type = "text/html"),
        (status = 401, description = "Token invalid or expired", body = String, content_type = "text/html"),
    )
)]
#[get("/reset-password")]
pub async fn reset_password_form_handler(
    query: web::Query<ResetTokenQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let token = match query.into_inner().token {
        Some(token) if !token.trim().is_empty() => token,
        _ => {
            return message_page(
                StatusCode::BAD_REQUEST,
                "Link no longer valid",
                "Token is required",
            )
        }
    };

    match data.verify_reset_token_use_case.execute(&token).await {
        Ok(user_id) => {
            info!(user_id = %user_id, "Rendering password reset form");
            reset_form(&token)
        }
        Err(err) => reset_error_page(&err),
    }
}

/// Submit a new password
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "users",
    request_body(content = ResetPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Password changed", body = String, content_type = "text/html"),
        (status = 400, description = "Mismatched or weak password", body = String, content_type = "text/html"),
        (status = 401, description = "Token invalid or expired", body = String, content_type = "text/html"),
        (status = 404, description = "Account no longer exists", body = String, content_type = "text/html"),
    )
)]
#[post("/reset-password")]
pub async fn reset_password_handler(
    form: web::Form<ResetPasswordForm>,
    data: web::Data<AppState>,
) -> impl Responder {
    let form = form.into_inner();
    let command = match ResetPasswordCommand::new(form.token, form.password, form.confirm_password)
    {
        Ok(cmd) => cmd,
        Err(e) => {
            return message_page(StatusCode::BAD_REQUEST, "Password not changed", &e.to_string())
        }
    };

    match data.reset_password_use_case.execute(command).await {
        Ok(()) => message_page(
            StatusCode::OK,
            "Password updated",
            "Your password has been changed. You can now sign in with the new password.",
        ),
        Err(err) => reset_error_page(&err),
    }
}
