pub mod credentials;

pub mod token;
pub use token::{Claims, TokenError, TokenService};

pub mod mailer;
pub use mailer::{Mailer, NoopMailer, SmtpMailer};

pub mod assets;
pub use assets::AssetStore;

pub mod admin_service;
pub mod admin_service_impl;
pub use admin_service::{AccountError, AdminInfo, AdminLoginResult, AdminService};
pub use admin_service_impl::{ROLE_ADMIN, ROLE_SUPER_ADMIN, SeaOrmAdminService};

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserInfo, UserLoginResult, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod password_reset;
pub use password_reset::PasswordResetService;

pub mod article_service;
pub mod article_service_impl;
pub use article_service::{ArticleError, ArticleInfo, ArticleService, create_slug};
pub use article_service_impl::SeaOrmArticleService;

pub mod like_service;
pub use like_service::{LikeService, ToggleOutcome};

/// Minimum length check shared by every password-setting path.
pub(crate) fn validate_new_password(password: &str) -> Result<(), AccountError> {
    if password.len() < 8 {
        return Err(AccountError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}
