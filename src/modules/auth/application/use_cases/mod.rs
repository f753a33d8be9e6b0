pub mod change_account_state;
pub mod list_accounts;
pub mod login_user;
pub mod password_reset;
pub mod refresh_token;
pub mod register_user;
pub mod update_profile;
pub mod update_profile_picture;
