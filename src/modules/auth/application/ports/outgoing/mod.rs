pub mod password_hasher;
pub mod refresh_token_repository;
pub mod token_provider;
pub mod user_query;
pub mod user_repository;

pub use password_hasher::{HashError, PasswordHasher};
pub use refresh_token_repository::{RefreshTokenRepository, RefreshTokenRepositoryError};
pub use token_provider::{
    IssuedRefreshToken, TokenClaims, TokenDomain, TokenError, TokenPair, TokenProvider,
    TokenSubject,
};
pub use user_query::{AccountFilter, UserQuery, UserQueryError};
pub use user_repository::{NewUserAccount, ProfileChanges, UserRepository, UserRepositoryError};
