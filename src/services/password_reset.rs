//! OTP-based password reset.
//!
//! `forgot_password` is actor-agnostic: it checks the administrator table
//! first, then the user table, and stores a six-digit OTP on whichever row
//! matched. Consuming the OTP happens through the actor-specific reset
//! endpoints.

use std::sync::Arc;

use tracing::warn;

use crate::db::Store;
use crate::services::admin_service::AccountError;
use crate::services::mailer::{Mailer, otp_email};
use crate::services::{credentials, validate_new_password};

pub struct PasswordResetService {
    store: Store,
    mailer: Arc<dyn Mailer>,
    client_origin: String,
}

impl PasswordResetService {
    #[must_use]
    pub fn new(store: Store, mailer: Arc<dyn Mailer>, client_origin: String) -> Self {
        Self {
            store,
            mailer,
            client_origin,
        }
    }

    /// Stores a fresh OTP for the account matching `email` and emails the
    /// reset link. Fails only when the email is registered in neither table.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AccountError> {
        let email = email.to_lowercase();
        let otp = credentials::generate_otp();

        if let Some(mut admin) = self.store.get_admin_by_email(&email).await? {
            admin.otp = Some(otp);
            admin.otp_requested = true;
            let admin = self.store.update_admin(admin).await?;

            let (subject, body) = otp_email(&admin.name, otp);
            let link = format!("{}/admin/change-password/{otp}", self.client_origin);
            let body = format!("{body}<p><a href=\"{link}\">{link}</a></p>");
            if let Err(e) = self.mailer.send(&admin.email, &subject, body).await {
                warn!("Failed to send OTP email to {}: {e:#}", admin.email);
            }
            return Ok(());
        }

        if let Some(mut user) = self.store.get_user_by_email(&email).await? {
            user.otp = Some(otp);
            user.otp_requested = true;
            let user = self.store.update_user(user).await?;

            let (subject, body) = otp_email(&user.full_name, otp);
            let link = format!("{}/change-password/{otp}", self.client_origin);
            let body = format!("{body}<p><a href=\"{link}\">{link}</a></p>");
            if let Err(e) = self.mailer.send(&user.email, &subject, body).await {
                warn!("Failed to send OTP email to {}: {e:#}", user.email);
            }
            return Ok(());
        }

        Err(AccountError::NotFound)
    }

    /// Consumes an administrator OTP and sets the new password.
    pub async fn reset_admin_password(
        &self,
        otp: i32,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AccountError> {
        if password != password_confirm {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        validate_new_password(password)?;

        let mut admin = self
            .store
            .get_admin_by_otp(otp)
            .await?
            .ok_or(AccountError::NotFound)?;

        admin.password_hash = credentials::hash_password(password.to_string()).await?;
        admin.otp = None;
        admin.otp_requested = false;
        self.store.update_admin(admin).await?;
        Ok(())
    }

    /// Consumes a user OTP and sets the new password.
    pub async fn reset_user_password(
        &self,
        otp: i32,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AccountError> {
        if password != password_confirm {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        validate_new_password(password)?;

        let mut user = self
            .store
            .get_user_by_otp(otp)
            .await?
            .ok_or(AccountError::NotFound)?;

        user.password_hash = credentials::hash_password(password.to_string()).await?;
        user.otp = None;
        user.otp_requested = false;
        self.store.update_user(user).await?;
        Ok(())
    }
}
