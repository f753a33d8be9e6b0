use crate::auth::application::use_cases::change_account_state::IChangeAccountStateUseCase;
use crate::auth::application::use_cases::list_accounts::IListAccountsUseCase;
use crate::auth::application::use_cases::login_user::ILoginUserUseCase;
use crate::auth::application::use_cases::password_reset::{
    IRequestPasswordResetUseCase, IResetPasswordUseCase, IVerifyResetTokenUseCase,
};
use crate::auth::application::use_cases::refresh_token::IRefreshTokenUseCase;
use crate::auth::application::use_cases::register_user::IRegisterUserUseCase;
use crate::auth::application::use_cases::update_profile::IUpdateProfileUseCase;
use crate::auth::application::use_cases::update_profile_picture::IUpdateProfilePictureUseCase;
use crate::tests::support::stubs::*;
use crate::AppState;
use actix_web::web;
use std::sync::Arc;

pub struct TestAppStateBuilder {
    register_user: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    login_user: Arc<dyn ILoginUserUseCase + Send + Sync>,
    refresh_token: Arc<dyn IRefreshTokenUseCase + Send + Sync>,
    update_profile: Arc<dyn IUpdateProfileUseCase + Send + Sync>,
    update_profile_picture: Arc<dyn IUpdateProfilePictureUseCase + Send + Sync>,
    request_password_reset: Arc<dyn IRequestPasswordResetUseCase + Send + Sync>,
    verify_reset_token: Arc<dyn IVerifyResetTokenUseCase + Send + Sync>,
    reset_password: Arc<dyn IResetPasswordUseCase + Send + Sync>,
    change_account_state: Arc<dyn IChangeAccountStateUseCase + Send + Sync>,
    list_accounts: Arc<dyn IListAccountsUseCase + Send + Sync>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            register_user: Arc::new(StubRegisterUserUseCase),
            login_user: Arc::new(StubLoginUserUseCase),
            refresh_token: Arc::new(StubRefreshTokenUseCase),
            update_profile: Arc::new(StubUpdateProfileUseCase),
            update_profile_picture: Arc::new(StubUpdateProfilePictureUseCase),
            request_password_reset: Arc::new(StubPasswordResetUseCase),
            verify_reset_token: Arc::new(StubPasswordResetUseCase),
            reset_password: Arc::new(StubPasswordResetUseCase),
            change_account_state: Arc::new(StubChangeAccountStateUseCase),
            list_accounts: Arc::new(StubListAccountsUseCase),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_register_user(
        mut self,
        uc: impl IRegisterUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.register_user = Arc::new(uc);
        self
    }

    pub fn with_login_user(mut self, uc: impl ILoginUserUseCase + Send + Sync + 'static) -> Self {
        self.login_user = Arc::new(uc);
        self
    }

    pub fn with_refresh_token(
        mut self,
        uc: impl IRefreshTokenUseCase + Send + Sync + 'static,
    ) -> Self {
        self.refresh_token = Arc::new(uc);
        self
    }

    pub fn with_update_profile(
        mut self,
        uc: impl IUpdateProfileUseCase + Send + Sync + 'static,
    ) -> Self {
        self.update_profile = Arc::new(uc);
        self
    }

    pub fn with_update_profile_picture(
        mut self,
        uc: impl IUpdateProfilePictureUseCase + Send + Sync + 'static,
    ) -> Self {
        self.update_profile_picture = Arc::new(uc);
        self
    }

    /// One value backs all three reset steps, as in production wiring.
    pub fn with_password_reset<U>(mut self, uc: U) -> Self
    where
        U: IRequestPasswordResetUseCase
            + IVerifyResetTokenUseCase
            + IResetPasswordUseCase
            + Send
            + Sync
            + 'static,
    {
        let uc = Arc::new(uc);
        self.request_password_reset = uc.clone();
        self.verify_reset_token = uc.clone();
        self.reset_password = uc;
        self
    }

    pub fn with_change_account_state(
        mut self,
        uc: impl IChangeAccountStateUseCase + Send + Sync + 'static,
    ) -> Self {
        self.change_account_state = Arc::new(uc);
        self
    }

    pub fn with_list_accounts(
        mut self,
        uc: impl IListAccountsUseCase + Send + Sync + 'static,
    ) -> Self {
        self.list_accounts = Arc::new(uc);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            register_user_use_case: self.register_user,
            login_user_use_case: self.login_user,
            refresh_token_use_case: self.refresh_token,
            update_profile_use_case: self.update_profile,
            update_profile_picture_use_case: self.update_profile_picture,
            request_password_reset_use_case: self.request_password_reset,
            verify_reset_token_use_case: self.verify_reset_token,
            reset_password_use_case: self.reset_password,
            change_account_state_use_case: self.change_account_state,
            list_accounts_use_case: self.list_accounts,
        })
    }
}
