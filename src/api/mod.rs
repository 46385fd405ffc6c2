use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AdminService, ArticleService, AssetStore, LikeService, Mailer, NoopMailer,
    PasswordResetService, SeaOrmAdminService, SeaOrmArticleService, SeaOrmUserService,
    SmtpMailer, TokenService, UserService,
};

mod admins;
mod articles;
pub mod auth;
mod error;
mod likes;
mod reset;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub tokens: TokenService,

    pub admin_service: Arc<dyn AdminService>,

    pub user_service: Arc<dyn UserService>,

    pub article_service: Arc<dyn ArticleService>,

    pub like_service: Arc<LikeService>,

    pub password_reset: Arc<PasswordResetService>,
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let mailer: Arc<dyn Mailer> = if config.smtp.enabled {
        Arc::new(SmtpMailer::new(&config.smtp)?)
    } else {
        Arc::new(NoopMailer)
    };

    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_minutes);
    let assets = AssetStore::new(&config.general.images_path)?;

    let admin_service = Arc::new(SeaOrmAdminService::new(
        store.clone(),
        tokens.clone(),
        mailer.clone(),
        config.smtp.client_origin.clone(),
        config.auth.allow_reclaim_deleted_identities,
    ));

    let user_service = Arc::new(SeaOrmUserService::new(
        store.clone(),
        tokens.clone(),
        mailer.clone(),
        config.smtp.client_origin.clone(),
        config.auth.allow_reclaim_deleted_identities,
    ));

    let article_service = Arc::new(SeaOrmArticleService::new(
        store.clone(),
        assets,
        config.server.max_page_size,
    ));

    let like_service = Arc::new(LikeService::new(store.clone()));

    let password_reset = Arc::new(PasswordResetService::new(
        store.clone(),
        mailer,
        config.smtp.client_origin.clone(),
    ));

    Ok(Arc::new(AppState {
        config,
        store,
        tokens,
        admin_service,
        user_service,
        article_service,
        like_service,
        password_reset,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let images_path = state.config.general.images_path.clone();
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let public_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/verifyemail/{code}", get(users::verify_email))
        .route("/change-password/{otp}", post(reset::reset_user_password))
        .route("/admin/register", post(admins::register))
        .route("/admin/login", post(admins::login))
        .route("/admin/verifyemail/{code}", get(admins::verify_email))
        .route(
            "/admin/change-password/{otp}",
            post(reset::reset_admin_password),
        )
        .route("/forgot-password", post(reset::forgot_password))
        .route("/article", get(articles::list))
        .route("/article/{id}", get(articles::get));

    let admin_routes = Router::new()
        .route("/admin", get(admins::list))
        .route("/admin", put(admins::update))
        .route("/admin", delete(admins::delete))
        .route("/admin/profile", get(admins::profile))
        .route("/admin/change-password", post(admins::change_password))
        .route("/admin/logout", get(admins::logout))
        .route("/admin/article", post(articles::create))
        .route("/admin/article/{id}", put(articles::update))
        .route("/admin/article/{id}", delete(articles::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let user_routes = Router::new()
        .route("/user", get(users::list))
        .route("/user", put(users::update))
        .route("/user", delete(users::delete))
        .route("/user/profile", get(users::profile))
        .route("/user/change-password", post(users::change_password))
        .route("/user/logout", get(users::logout))
        .route("/user/liked", get(likes::list_liked))
        .route("/article/like/{id}", get(likes::toggle))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(user_routes)
        .nest_service("/images", tower_http::services::ServeDir::new(images_path))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
