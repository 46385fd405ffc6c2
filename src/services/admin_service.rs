//! Domain service for administrator accounts.
//!
//! Covers registration, email verification, login, password changes, and
//! profile management for the admin actor type.

use serde::Serialize;
use thiserror::Error;

use crate::entities::administrators;

/// Errors specific to administrator account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is not verified")]
    NotVerified,

    #[error("Account not found")]
    NotFound,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Public profile DTO for administrators.
#[derive(Debug, Clone, Serialize)]
pub struct AdminInfo {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub photo_profile: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<administrators::Model> for AdminInfo {
    fn from(m: administrators::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            username: m.username,
            email: m.email,
            role: m.role,
            verified: m.verified,
            photo_profile: m.photo_profile,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Login result: the signed token plus the profile it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AdminLoginResult {
    pub token: String,
    #[serde(flatten)]
    pub info: AdminInfo,
}

#[derive(Debug, Clone)]
pub struct RegisterAdmin {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Profile update payload. Deliberately has no password field; password
/// changes go through [`AdminService::change_password`] only.
#[derive(Debug, Clone)]
pub struct UpdateAdmin {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub photo_profile: Option<String>,
}

/// Domain service trait for administrator accounts.
#[async_trait::async_trait]
pub trait AdminService: Send + Sync {
    /// Registers a new administrator with `verified = false` and sends a
    /// verification email (best-effort).
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateUsername`] / [`AccountError::DuplicateEmail`]
    /// when the identity is taken, [`AccountError::Validation`] on a
    /// password confirmation mismatch.
    async fn register(&self, req: RegisterAdmin) -> Result<AdminInfo, AccountError>;

    /// Consumes a verification code, marking the account verified.
    async fn verify_email(&self, code: &str) -> Result<(), AccountError>;

    /// Verifies credentials and issues a one-hour token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] on a bad username or
    /// password and [`AccountError::NotVerified`] before email verification.
    async fn login(&self, username: &str, password: &str) -> Result<AdminLoginResult, AccountError>;

    /// Changes the password after confirming the old one.
    async fn change_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AccountError>;

    async fn get_all(&self) -> Result<Vec<AdminInfo>, AccountError>;

    async fn get_by_id(&self, id: i32) -> Result<AdminInfo, AccountError>;

    /// Applies a profile update for the acting administrator. Role changes
    /// are permitted only to Super Admins and only to a known role.
    async fn update(&self, id: i32, req: UpdateAdmin) -> Result<AdminInfo, AccountError>;

    /// Soft-deletes the account after confirming the password.
    async fn delete(&self, id: i32, password: &str) -> Result<(), AccountError>;
}
