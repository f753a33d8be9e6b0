use crate::auth::application::domain::{AccountStatus, Role, UserAccount};
use crate::auth::application::use_cases::update_profile::DATE_OF_BIRTH_FORMAT;
use serde::Serialize;
use utoipa::ToSchema;

/// Public view of an account. The credential hash never leaves the service.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    /// User ID (UUID)
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: String,

    #[schema(example = "johndoe")]
    pub username: String,

    #[schema(example = "john@example.com")]
    pub email: String,

    #[schema(example = "john")]
    pub first_name: String,

    #[schema(example = "doe")]
    pub last_name: String,

    #[schema(example = "+6281234567890")]
    pub phone_number: Option<String>,

    /// Date of birth as DD-MM-YYYY
    #[schema(example = "31-12-1990")]
    pub date_of_birth: Option<String>,

    #[schema(example = "male")]
    pub gender: Option<String>,

    #[schema(example = "https://cdn.example.com/avatars/johndoe.png")]
    pub profile_picture: Option<String>,

    #[schema(value_type = String, example = "user")]
    pub role: Role,

    #[schema(value_type = String, example = "active")]
    pub status: AccountStatus,

    #[schema(example = false)]
    pub two_factor_auth: bool,

    #[schema(example = "2025-01-15T10:30:00Z")]
    pub created_at: String,

    #[schema(example = "2025-01-15T10:30:00Z")]
    pub updated_at: String,

    #[schema(example = "2025-01-16T08:00:00Z")]
    pub last_login: Option<String>,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            phone_number: account.phone_number,
            date_of_birth: account
                .date_of_birth
                .map(|d| d.format(DATE_OF_BIRTH_FORMAT).to_string()),
            gender: account.gender,
            profile_picture: account.profile_picture,
            role: account.role,
            status: account.status,
            two_factor_auth: account.two_factor_auth,
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
            last_login: account.last_login.map(|t| t.to_rfc3339()),
        }
    }
}
