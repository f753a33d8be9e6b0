use chrono::Utc;
use uuid::Uuid;

use crate::auth::application::domain::{AccountStatus, Role, UserAccount};

pub fn user_account(email: &str, role: Role, status: AccountStatus) -> UserAccount {
    let now = Utc::now();
    UserAccount {
        id: Uuid::new_v4(),
        username: "johndoe".to_string(),
        email: email.to_string(),
        password_hash: "hashed_password".to_string(),
        first_name: "john".to_string(),
        last_name: "doe".to_string(),
        phone_number: None,
        date_of_birth: None,
        gender: None,
        profile_picture: None,
        role,
        status,
        two_factor_auth: false,
        created_at: now,
        updated_at: now,
        last_login: None,
    }
}

pub fn active_user(email: &str) -> UserAccount {
    user_account(email, Role::User, AccountStatus::Active)
}
