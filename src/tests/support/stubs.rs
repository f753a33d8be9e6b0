use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::UserAccount;
use crate::auth::application::use_cases::change_account_state::{
    ChangeAccountStateCommand, ChangeAccountStateError, IChangeAccountStateUseCase,
};
use crate::auth::application::use_cases::list_accounts::{
    IListAccountsUseCase, ListAccountsError, ListAccountsQuery,
};
use crate::auth::application::use_cases::login_user::{
    ILoginUserUseCase, LoginError, LoginRequest, LoginUserResponse,
};
use crate::auth::application::use_cases::password_reset::{
    IRequestPasswordResetUseCase, IResetPasswordUseCase, IVerifyResetTokenUseCase,
    PasswordResetError, RequestPasswordResetCommand, ResetPasswordCommand,
};
use crate::auth::application::use_cases::refresh_token::{
    IRefreshTokenUseCase, RefreshTokenError, RefreshTokenRequest, RefreshTokenResponse,
};
use crate::auth::application::use_cases::register_user::{
    IRegisterUserUseCase, RegisterUserCommand, RegisterUserError,
};
use crate::auth::application::use_cases::update_profile::{
    IUpdateProfileUseCase, UpdateProfileCommand, UpdateProfileError,
};
use crate::auth::application::use_cases::update_profile_picture::{
    IUpdateProfilePictureUseCase, UpdateProfilePictureCommand, UpdateProfilePictureError,
};

#[derive(Default, Clone)]
pub struct StubRegisterUserUseCase;

#[async_trait]
impl IRegisterUserUseCase for StubRegisterUserUseCase {
    async fn execute(&self, _: RegisterUserCommand) -> Result<UserAccount, RegisterUserError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubLoginUserUseCase;

#[async_trait]
impl ILoginUserUseCase for StubLoginUserUseCase {
    async fn execute(&self, _: LoginRequest) -> Result<LoginUserResponse, LoginError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubRefreshTokenUseCase;

#[async_trait]
impl IRefreshTokenUseCase for StubRefreshTokenUseCase {
    async fn execute(
        &self,
        _: RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, RefreshTokenError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubUpdateProfileUseCase;

#[async_trait]
impl IUpdateProfileUseCase for StubUpdateProfileUseCase {
    async fn execute(&self, _: UpdateProfileCommand) -> Result<UserAccount, UpdateProfileError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubUpdateProfilePictureUseCase;

#[async_trait]
impl IUpdateProfilePictureUseCase for StubUpdateProfilePictureUseCase {
    async fn execute(
        &self,
        _: UpdateProfilePictureCommand,
    ) -> Result<UserAccount, UpdateProfilePictureError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubPasswordResetUseCase;

#[async_trait]
impl IRequestPasswordResetUseCase for StubPasswordResetUseCase {
    async fn execute(&self, _: RequestPasswordResetCommand) -> Result<(), PasswordResetError> {
        unimplemented!("Not used in this test")
    }
}

#[async_trait]
impl IVerifyResetTokenUseCase for StubPasswordResetUseCase {
    async fn execute(&self, _: &str) -> Result<Uuid, PasswordResetError> {
        unimplemented!("Not used in this test")
    }
}

#[async_trait]
impl IResetPasswordUseCase for StubPasswordResetUseCase {
    async fn execute(&self, _: ResetPasswordCommand) -> Result<(), PasswordResetError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubChangeAccountStateUseCase;

#[async_trait]
impl IChangeAccountStateUseCase for StubChangeAccountStateUseCase {
    async fn execute(
        &self,
        _: ChangeAccountStateCommand,
    ) -> Result<UserAccount, ChangeAccountStateError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubListAccountsUseCase;

#[async_trait]
impl IListAccountsUseCase for StubListAccountsUseCase {
    async fn execute(&self, _: ListAccountsQuery) -> Result<Vec<UserAccount>, ListAccountsError> {
        unimplemented!("Not used in this test")
    }
}
