use chrono::{DateTime, NaiveDate, Utc};
use email_address::EmailAddress;
use uuid::Uuid;

use super::account_state::{AccountState, AccountStatus, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub two_factor_auth: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn state(&self) -> AccountState {
        AccountState::new(self.role, self.status)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Trims and lowercases an email address, rejecting anything that is not a
/// syntactically valid address.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim();
    if email.is_empty() || !EmailAddress::is_valid(email) {
        return None;
    }
    Some(email.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  John.Doe@Example.COM "),
            Some("john.doe@example.com".to_string())
        );
        assert_eq!(normalize_email(""), None);
        assert_eq!(normalize_email("not-an-email"), None);
    }
}
