//! Domain service for regular user accounts.

use serde::Serialize;

use crate::entities::users;

pub use super::admin_service::AccountError;

/// Public profile DTO for users.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub photo_profile: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<users::Model> for UserInfo {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            full_name: m.full_name,
            email: m.email,
            role: m.role,
            verified: m.verified,
            photo_profile: m.photo_profile,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLoginResult {
    pub token: String,
    #[serde(flatten)]
    pub info: UserInfo,
}

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Profile update payload; no password field by design.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub photo_profile: Option<String>,
}

/// Domain service trait for user accounts. Mirrors
/// [`super::admin_service::AdminService`] minus the role machinery: a user's
/// role is always `User`.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, req: RegisterUser) -> Result<UserInfo, AccountError>;

    async fn verify_email(&self, code: &str) -> Result<(), AccountError>;

    async fn login(&self, username: &str, password: &str) -> Result<UserLoginResult, AccountError>;

    async fn change_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AccountError>;

    async fn get_all(&self) -> Result<Vec<UserInfo>, AccountError>;

    async fn get_by_id(&self, id: i32) -> Result<UserInfo, AccountError>;

    async fn update(&self, id: i32, req: UpdateUser) -> Result<UserInfo, AccountError>;

    async fn delete(&self, id: i32, password: &str) -> Result<(), AccountError>;
}
