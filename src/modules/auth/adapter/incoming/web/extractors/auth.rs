use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use std::{
    future::{ready, Ready},
    sync::Arc,
};
use uuid::Uuid;

use crate::auth::application::domain::Role;
use crate::auth::application::ports::outgoing::{TokenDomain, TokenError, TokenProvider};
use crate::shared::api::ApiResponse;

const BEARER_SCHEME: &str = "Bearer ";

/// Caller identity taken from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

enum HeaderError {
    Missing,
    WrongScheme,
}

fn extract_bearer_token(req: &HttpRequest) -> Result<String, HeaderError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or(HeaderError::Missing)?;

    header
        .strip_prefix(BEARER_SCHEME)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(HeaderError::WrongScheme)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ActixError> {
    if let Some(user) = req.extensions().get::<AuthenticatedUser>() {
        return Ok(user.clone());
    }

    let token_provider = req
        .app_data::<web::Data<Arc<dyn TokenProvider + Send + Sync>>>()
        .ok_or_else(|| {
            tracing::error!("Token provider is not registered as app data");
            create_api_error(ApiResponse::internal_error())
        })?;

    let token = extract_bearer_token(req).map_err(|e| match e {
        HeaderError::Missing => create_api_error(ApiResponse::bad_request(
            "MISSING_AUTH_HEADER",
            "Authorization header is required",
        )),
        HeaderError::WrongScheme => create_api_error(ApiResponse::unauthorized(
            "INVALID_AUTH_HEADER",
            "Authorization header must use the Bearer scheme",
        )),
    })?;

    let claims = token_provider
        .parse_and_validate(&token, TokenDomain::Access)
        .map_err(|e| match e {
            TokenError::Expired => create_api_error(ApiResponse::unauthorized(
                "TOKEN_EXPIRED",
                "Access token has expired",
            )),
            _ => create_api_error(ApiResponse::unauthorized(
                "INVALID_TOKEN",
                "Invalid or expired token",
            )),
        })?;

    let user = AuthenticatedUser {
        user_id: claims.user_id,
        username: claims.username,
        email: claims.email,
        role: claims.role,
    };
    req.extensions_mut().insert(user.clone());

    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// An authenticated caller holding `admin` or `superadmin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub AuthenticatedUser);

impl AdminUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|user| {
            if user.role.is_administrator() {
                Ok(AdminUser(user))
            } else {
                tracing::warn!(user_id = %user.user_id, role = %user.role, "Administrative access denied");
                Err(create_api_error(ApiResponse::forbidden(
                    "FORBIDDEN",
                    "Administrator privileges required",
                )))
            }
        });

        ready(result)
    }
}
