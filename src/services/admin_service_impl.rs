//! `SeaORM` implementation of the `AdminService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::db::{IdentityConflict, NewAdmin, Store};
use crate::services::admin_service::{
    AccountError, AdminInfo, AdminLoginResult, AdminService, RegisterAdmin, UpdateAdmin,
};
use crate::services::mailer::{Mailer, verification_email};
use crate::services::token::TokenService;
use crate::services::{credentials, validate_new_password};

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_SUPER_ADMIN: &str = "Super Admin";

pub struct SeaOrmAdminService {
    store: Store,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    client_origin: String,
    allow_reclaim_deleted: bool,
}

impl SeaOrmAdminService {
    #[must_use]
    pub fn new(
        store: Store,
        tokens: TokenService,
        mailer: Arc<dyn Mailer>,
        client_origin: String,
        allow_reclaim_deleted: bool,
    ) -> Self {
        Self {
            store,
            tokens,
            mailer,
            client_origin,
            allow_reclaim_deleted,
        }
    }
}

#[async_trait]
impl AdminService for SeaOrmAdminService {
    async fn register(&self, req: RegisterAdmin) -> Result<AdminInfo, AccountError> {
        if req.password != req.password_confirm {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        validate_new_password(&req.password)?;

        let password_hash = credentials::hash_password(req.password).await?;
        let verification_code = credentials::generate_verification_code();

        let admin = NewAdmin {
            name: req.name,
            username: req.username,
            email: req.email.to_lowercase(),
            password_hash,
            verification_code: verification_code.clone(),
        };

        let model = match self
            .store
            .register_admin(admin, !self.allow_reclaim_deleted)
            .await?
        {
            Ok(model) => model,
            Err(IdentityConflict::Username) => return Err(AccountError::DuplicateUsername),
            Err(IdentityConflict::Email) => return Err(AccountError::DuplicateEmail),
        };

        let url = format!("{}/admin/verifyemail/{verification_code}", self.client_origin);
        let (subject, body) = verification_email(&model.name, &url);
        if let Err(e) = self.mailer.send(&model.email, &subject, body).await {
            warn!("Failed to send verification email to {}: {e:#}", model.email);
        }

        Ok(model.into())
    }

    async fn verify_email(&self, code: &str) -> Result<(), AccountError> {
        let mut admin = self
            .store
            .get_admin_by_verification_code(code)
            .await?
            .ok_or(AccountError::NotFound)?;

        if admin.verified {
            return Err(AccountError::Validation(
                "Account is already verified".to_string(),
            ));
        }

        admin.verification_code = None;
        admin.verified = true;
        self.store.update_admin(admin).await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<AdminLoginResult, AccountError> {
        let admin = self
            .store
            .get_admin_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !admin.verified {
            return Err(AccountError::NotVerified);
        }

        let matches =
            credentials::verify_password(password.to_string(), admin.password_hash.clone()).await?;
        if !matches {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(admin.id, &admin.username, &admin.email, &admin.role)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        Ok(AdminLoginResult {
            token,
            info: admin.into(),
        })
    }

    async fn change_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AccountError> {
        if new_password != confirm_password {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        validate_new_password(new_password)?;

        let mut admin = self
            .store
            .get_admin_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let matches = credentials::verify_password(
            old_password.to_string(),
            admin.password_hash.clone(),
        )
        .await?;
        if !matches {
            return Err(AccountError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        admin.password_hash = credentials::hash_password(new_password.to_string()).await?;
        self.store.update_admin(admin).await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<AdminInfo>, AccountError> {
        let admins = self.store.list_admins().await?;
        Ok(admins.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<AdminInfo, AccountError> {
        let admin = self
            .store
            .get_admin_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;
        Ok(admin.into())
    }

    async fn update(&self, id: i32, req: UpdateAdmin) -> Result<AdminInfo, AccountError> {
        let mut admin = self
            .store
            .get_admin_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if let Some(role) = req.role {
            if role != admin.role {
                if admin.role != ROLE_SUPER_ADMIN {
                    return Err(AccountError::Forbidden(
                        "Only a Super Admin may change roles".to_string(),
                    ));
                }
                if role != ROLE_ADMIN && role != ROLE_SUPER_ADMIN {
                    return Err(AccountError::Validation(format!(
                        "Unknown role '{role}'"
                    )));
                }
                admin.role = role;
            }
        }

        if let Some(name) = req.name {
            admin.name = name;
        }
        if let Some(email) = req.email {
            let email = email.to_lowercase();
            if email != admin.email {
                if self.store.get_admin_by_email(&email).await?.is_some() {
                    return Err(AccountError::DuplicateEmail);
                }
                admin.email = email;
            }
        }
        if let Some(photo) = req.photo_profile {
            admin.photo_profile = photo;
        }

        let updated = self.store.update_admin(admin).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i32, password: &str) -> Result<(), AccountError> {
        let admin = self
            .store
            .get_admin_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let matches =
            credentials::verify_password(password.to_string(), admin.password_hash.clone()).await?;
        if !matches {
            return Err(AccountError::Validation(
                "Password confirmation is incorrect".to_string(),
            ));
        }

        self.store.soft_delete_admin(admin).await?;
        Ok(())
    }
}
