use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::application::domain::Role;
use crate::auth::application::ports::outgoing::{TokenClaims, TokenProvider, TokenSubject};

pub const TEST_ACCESS_SECRET: &str = "test-access-secret-0123456789abcdef0123";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret-0123456789abcdef0123";
pub const TEST_RESET_SECRET: &str = "test-reset-secret-0123456789abcdef0123";

pub fn create_test_jwt_service() -> JwtTokenService {
    let config = JwtConfig::new(TEST_ACCESS_SECRET, TEST_REFRESH_SECRET, TEST_RESET_SECRET)
        .expect("test JWT config is valid");
    JwtTokenService::new(config)
}

pub fn test_token_provider() -> Arc<dyn TokenProvider + Send + Sync> {
    Arc::new(create_test_jwt_service())
}

pub fn test_subject(role: Role) -> TokenSubject {
    TokenSubject {
        user_id: Uuid::new_v4(),
        username: "johndoe".to_string(),
        email: "john@example.com".to_string(),
        role,
    }
}

/// `Authorization` header value carrying a valid access token for `subject`.
pub fn bearer_for(subject: &TokenSubject) -> String {
    let token = create_test_jwt_service()
        .issue_access_token(subject)
        .expect("access token issued");
    format!("Bearer {}", token)
}

/// Correctly signed access token for `subject` that expired a minute ago.
pub fn expired_bearer_for(subject: &TokenSubject) -> String {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        user_id: subject.user_id,
        username: subject.username.clone(),
        email: subject.email.clone(),
        role: subject.role,
        sub: subject.user_id.to_string(),
        iat: now - 3600,
        exp: now - 60,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_ACCESS_SECRET.as_bytes()),
    )
    .expect("expired access token encoded");
    format!("Bearer {}", token)
}
