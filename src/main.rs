mod api;
mod config;
pub mod health;
pub mod modules;
mod shared;

pub use modules::auth;
pub use modules::email;

use crate::api::openapi::ApiDoc;
use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::adapter::outgoing::{
    RefreshTokenRepositoryPostgres, UserQueryPostgres, UserRepositoryPostgres,
};
use crate::auth::application::ports::incoming::PasswordPolicy;
use crate::auth::application::ports::outgoing::TokenProvider;
use crate::auth::application::services::hash::PasswordHashingService;
use crate::auth::application::services::password::BasicPasswordPolicy;
use crate::auth::application::services::UsernameAllocator;
use crate::auth::application::use_cases::{
    change_account_state::{ChangeAccountStateUseCase, IChangeAccountStateUseCase},
    list_accounts::{IListAccountsUseCase, ListAccountsUseCase},
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    password_reset::{
        IRequestPasswordResetUseCase, IResetPasswordUseCase, IVerifyResetTokenUseCase,
        PasswordResetUseCase,
    },
    refresh_token::{IRefreshTokenUseCase, RefreshTokenUseCase},
    register_user::{IRegisterUserUseCase, RegisterUserUseCase},
    update_profile::{IUpdateProfileUseCase, UpdateProfileUseCase},
    update_profile_picture::{IUpdateProfilePictureUseCase, UpdateProfilePictureUseCase},
};
use crate::config::{AppConfig, SmtpSettings};
use crate::email::adapter::outgoing::SmtpEmailSender;
use crate::email::application::ports::outgoing::{EmailSender, UserEmailNotifier};
use crate::email::application::services::UserEmailService;
use crate::shared::api::custom_json_config;

use actix_web::{web, App, HttpServer};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub register_user_use_case: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase + Send + Sync>,
    pub refresh_token_use_case: Arc<dyn IRefreshTokenUseCase + Send + Sync>,
    pub update_profile_use_case: Arc<dyn IUpdateProfileUseCase + Send + Sync>,
    pub update_profile_picture_use_case: Arc<dyn IUpdateProfilePictureUseCase + Send + Sync>,
    pub request_password_reset_use_case: Arc<dyn IRequestPasswordResetUseCase + Send + Sync>,
    pub verify_reset_token_use_case: Arc<dyn IVerifyResetTokenUseCase + Send + Sync>,
    pub reset_password_use_case: Arc<dyn IResetPasswordUseCase + Send + Sync>,
    pub change_account_state_use_case: Arc<dyn IChangeAccountStateUseCase + Send + Sync>,
    pub list_accounts_use_case: Arc<dyn IListAccountsUseCase + Send + Sync>,
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!(error = %err, "{}", context);
    io::Error::other(format!("{context}: {err}"))
}

#[cfg(not(tarpaulin_include))]
fn load_env_files() {
    // Try .env.{environment} first, then fall back to .env
    let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    if dotenvy::from_filename(format!(".env.{}", env)).is_err() {
        dotenvy::dotenv().ok();
    }
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> io::Result<()> {
    load_env_files();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    let jwt_config =
        JwtConfig::from_env().map_err(|e| startup_error("Invalid JWT configuration", e))?;

    // Database connection
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;

    if config.run_migrations {
        Migrator::up(&conn, None)
            .await
            .map_err(|e| startup_error("Failed to run migrations", e))?;
        info!("Migrations applied");
    }

    let db_arc = Arc::new(conn);

    // SMTP
    let smtp_sender = match &config.smtp {
        SmtpSettings::Local { host, port } => {
            SmtpEmailSender::new_local(host, *port, &config.email_from)
        }
        SmtpSettings::Relay {
            server,
            username,
            password,
        } => SmtpEmailSender::new(server, username, password, &config.email_from)
            .map_err(|e| startup_error("Failed to configure SMTP relay", e))?,
    };
    let email_sender: Arc<dyn EmailSender + Send + Sync> = Arc::new(smtp_sender);
    let email_notifier: Arc<dyn UserEmailNotifier + Send + Sync> =
        Arc::new(UserEmailService::new(email_sender, &config.app_base_url));

    // Adapters
    let token_provider: Arc<dyn TokenProvider + Send + Sync> =
        Arc::new(JwtTokenService::new(jwt_config));
    let user_query = UserQueryPostgres::new(Arc::clone(&db_arc));
    let user_repo = UserRepositoryPostgres::new(Arc::clone(&db_arc));
    let refresh_token_repo = RefreshTokenRepositoryPostgres::new(Arc::clone(&db_arc));
    let password_hasher = PasswordHashingService::new(config.password_hasher);
    let password_policy: Arc<dyn PasswordPolicy + Send + Sync> = Arc::new(BasicPasswordPolicy);

    info!(
        environment = %config.environment,
        hasher = ?config.password_hasher,
        "Adapters ready"
    );

    // Use cases
    let register_user_use_case = RegisterUserUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        password_hasher.clone(),
        Arc::clone(&password_policy),
        UsernameAllocator::new(config.username_max_suffix),
    );
    let login_user_use_case = LoginUserUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        refresh_token_repo,
        password_hasher.clone(),
        Arc::clone(&token_provider),
    );
    let refresh_token_use_case = RefreshTokenUseCase::new(Arc::clone(&token_provider));
    let password_reset_use_case = Arc::new(PasswordResetUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        Arc::clone(&token_provider),
        email_notifier,
        password_hasher,
        password_policy,
    ));
    let change_account_state_use_case =
        ChangeAccountStateUseCase::new(user_query.clone(), user_repo.clone());
    let list_accounts_use_case = ListAccountsUseCase::new(user_query);

    let state = AppState {
        register_user_use_case: Arc::new(register_user_use_case),
        login_user_use_case: Arc::new(login_user_use_case),
        refresh_token_use_case: Arc::new(refresh_token_use_case),
        update_profile_use_case: Arc::new(UpdateProfileUseCase::new(user_repo.clone())),
        update_profile_picture_use_case: Arc::new(UpdateProfilePictureUseCase::new(user_repo)),
        request_password_reset_use_case: password_reset_use_case.clone(),
        verify_reset_token_use_case: password_reset_use_case.clone(),
        reset_password_use_case: password_reset_use_case,
        change_account_state_use_case: Arc::new(change_account_state_use_case),
        list_accounts_use_case: Arc::new(list_accounts_use_case),
    };

    let server_url = config.server_url();
    info!(address = %server_url, "Server listening");

    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider)))
            .app_data(web::Data::new(Arc::clone(&db_arc)))
            .app_data(custom_json_config())
            .configure(init_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind(server_url)?
    .run()
    .await
}

fn init_routes(cfg: &mut web::ServiceConfig) {
    use crate::auth::adapter::incoming::web::routes;

    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Users
    cfg.service(routes::register_user_handler);
    cfg.service(routes::login_user_handler);
    cfg.service(routes::refresh_token_handler);
    cfg.service(routes::update_profile_handler);
    cfg.service(routes::update_profile_picture_handler);
    cfg.service(routes::request_password_reset_handler);
    cfg.service(routes::reset_password_form_handler);
    cfg.service(routes::reset_password_handler);
    // Admin
    cfg.service(routes::promote_admin_handler);
    cfg.service(routes::promote_super_admin_handler);
    cfg.service(routes::demote_super_admin_to_admin_handler);
    cfg.service(routes::demote_super_admin_to_user_handler);
    cfg.service(routes::demote_admin_to_user_handler);
    cfg.service(routes::suspend_user_handler);
    cfg.service(routes::recover_user_handler);
    cfg.service(routes::delete_user_handler);
    cfg.service(routes::list_accounts_handler);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
        std::process::exit(1);
    }
}
