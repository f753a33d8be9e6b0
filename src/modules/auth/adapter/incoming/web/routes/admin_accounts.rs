use super::account_response::AccountResponse;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::adapter::incoming::web::extractors::AdminUser;
use crate::auth::application::domain::{AccountStatus, AccountTransition, Role};
use crate::auth::application::use_cases::change_account_state::{
    ChangeAccountStateCommand, ChangeAccountStateError,
};
use crate::auth::application::use_cases::list_accounts::{ListAccountsError, ListAccountsQuery};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

/// Target account of an administrative action.
#[derive(Deserialize, ToSchema)]
pub struct AccountEmailRequest {
    #[schema(example = "john@example.com")]
    pub email: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsParams {
    /// `user`, `admin` or `superadmin`
    pub role: Option<String>,
    /// `active`, `suspended` or `deleted`
    pub status: Option<String>,
    /// Page size, 1 to 100
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct ListAccountsResponse {
    accounts: Vec<AccountResponse>,
    #[schema(example = 100)]
    limit: u64,
    #[schema(example = 0)]
    offset: u64,
}

async fn apply_transition(
    admin: AdminUser,
    req: AccountEmailRequest,
    data: &AppState,
    transition: AccountTransition,
) -> HttpResponse {
    let command = match ChangeAccountStateCommand::new(admin.user_id(), req.email, transition) {
        Ok(cmd) => cmd,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.change_account_state_use_case.execute(command).await {
        Ok(account) => ApiResponse::success(AccountResponse::from(account)),
        Err(ChangeAccountStateError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(ChangeAccountStateError::InvalidTransition(e)) => {
            ApiResponse::bad_request("INVALID_TRANSITION", e.reason())
        }
        Err(ChangeAccountStateError::RepositoryError(e)) => {
            error!(actor_id = %admin.user_id(), transition = %transition, error = %e, "Account state change failed");
            ApiResponse::internal_error()
        }
    }
}

/// Promote a user to admin
#[utoipa::path(
    put,
    path = "/api/admin/promote-admin",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is already an admin" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/promote-admin")]
pub async fn promote_admin_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::PromoteToAdmin).await
}

/// Promote an account to superadmin
#[utoipa::path(
    put,
    path = "/api/admin/promote-super-admin",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is already a super admin" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/promote-super-admin")]
pub async fn promote_super_admin_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::PromoteToSuperadmin).await
}

/// Demote a superadmin to admin
#[utoipa::path(
    put,
    path = "/api/admin/demote-super-admin-to-admin",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is not a super admin" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/demote-super-admin-to-admin")]
pub async fn demote_super_admin_to_admin_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::DemoteSuperadminToAdmin).await
}

/// Demote a superadmin to user
#[utoipa::path(
    put,
    path = "/api/admin/demote-super-admin-to-user",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is not a super admin" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/demote-super-admin-to-user")]
pub async fn demote_super_admin_to_user_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::DemoteSuperadminToUser).await
}

/// Demote an admin to user
#[utoipa::path(
    put,
    path = "/api/admin/demote-admin-to-user",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is not an admin" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/demote-admin-to-user")]
pub async fn demote_admin_to_user_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::DemoteAdminToUser).await
}

/// Suspend an account
#[utoipa::path(
    put,
    path = "/api/admin/suspend-user",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is already suspended" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/suspend-user")]
pub async fn suspend_user_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::Suspend).await
}

/// Reactivate a suspended account
#[utoipa::path(
    put,
    path = "/api/admin/recover-user",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is already active" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/recover-user")]
pub async fn recover_user_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::Recover).await
}

/// Mark an account as deleted
#[utoipa::path(
    delete,
    path = "/api/admin/delete-user",
    tag = "admin",
    request_body = AccountEmailRequest,
    responses(
        (status = 200, description = "Account updated", body = inline(SuccessResponse<AccountResponse>)),
        (
            status = 400,
            description = "Transition not allowed from the current state",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TRANSITION", "message": "User is already deleted" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[delete("/api/admin/delete-user")]
pub async fn delete_user_handler(
    admin: AdminUser,
    req: web::Json<AccountEmailRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    apply_transition(admin, req.into_inner(), &data, AccountTransition::Delete).await
}

/// List accounts
///
/// Newest first. Filter by role or by status, not both.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    params(ListAccountsParams),
    responses(
        (status = 200, description = "Accounts", body = inline(SuccessResponse<ListAccountsResponse>)),
        (status = 400, description = "Unknown filter value or conflicting filters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[get("/api/admin/users")]
pub async fn list_accounts_handler(
    admin: AdminUser,
    params: web::Query<ListAccountsParams>,
    data: web::Data<AppState>,
) -> impl Responder {
    let params = params.into_inner();

    let role = match params.role.as_deref().map(str::parse::<Role>).transpose() {
        Ok(role) => role,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };
    let status = match params
        .status
        .as_deref()
        .map(str::parse::<AccountStatus>)
        .transpose()
    {
        Ok(status) => status,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    let query = match ListAccountsQuery::new(role, status, params.limit, params.offset) {
        Ok(query) => query,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };
    let (limit, offset) = (query.limit(), query.offset());

    match data.list_accounts_use_case.execute(query).await {
        Ok(accounts) => {
            info!(actor_id = %admin.user_id(), count = accounts.len(), "Accounts listed");
            ApiResponse::success(ListAccountsResponse {
                accounts: accounts.into_iter().map(AccountResponse::from).collect(),
                limit,
                offset,
            })
        }
        Err(ListAccountsError::QueryError(e)) => {
            error!(actor_id = %admin.user_id(), error = %e, "Account listing failed");
            ApiResponse::internal_error()
        }
    }
}
