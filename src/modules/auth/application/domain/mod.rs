pub mod account_state;
pub mod entities;

pub use account_state::{
    AccountState, AccountStatus, AccountTransition, InvalidTransition, Role, TransitionEffect,
};
pub use entities::{normalize_email, RefreshTokenRecord, UserAccount};
