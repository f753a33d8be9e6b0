mod account_response;
mod admin_accounts;
mod login_user;
mod password_reset;
mod refresh_token;
mod register_user;
mod update_profile;

// Glob re-exports carry the `__path_*` types generated by `#[utoipa::path]`.
pub use account_response::*;
pub use admin_accounts::*;
pub use login_user::*;
pub use password_reset::*;
pub use refresh_token::*;
pub use register_user::*;
pub use update_profile::*;
