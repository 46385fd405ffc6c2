//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::db::{IdentityConflict, NewUser, Store};
use crate::services::mailer::{Mailer, verification_email};
use crate::services::token::TokenService;
use crate::services::user_service::{
    AccountError, RegisterUser, UpdateUser, UserInfo, UserLoginResult, UserService,
};
use crate::services::{credentials, validate_new_password};

pub struct SeaOrmUserService {
    store: Store,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    client_origin: String,
    allow_reclaim_deleted: bool,
}

impl SeaOrmUserService {
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
impl UserService for SeaOrmUserService {
    async fn register(&self, req: RegisterUser) -> Result<UserInfo, AccountError> {
        if req.password != req.password_confirm {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        validate_new_password(&req.password)?;

        let password_hash = credentials::hash_password(req.password).await?;
        let verification_code = credentials::generate_verification_code();

        let user = NewUser {
            username: req.username,
            full_name: req.full_name,
            email: req.email.to_lowercase(),
            password_hash,
            verification_code: verification_code.clone(),
        };

        let model = match self
            .store
            .register_user(user, !self.allow_reclaim_deleted)
            .await?
        {
            Ok(model) => model,
            Err(IdentityConflict::Username) => return Err(AccountError::DuplicateUsername),
            Err(IdentityConflict::Email) => return Err(AccountError::DuplicateEmail),
        };

        let url = format!("{}/verifyemail/{verification_code}", self.client_origin);
        let (subject, body) = verification_email(&model.full_name, &url);
        if let Err(e) = self.mailer.send(&model.email, &subject, body).await {
            warn!("Failed to send verification email to {}: {e:#}", model.email);
        }

        Ok(model.into())
    }

    async fn verify_email(&self, code: &str) -> Result<(), AccountError> {
        let mut user = self
            .store
            .get_user_by_verification_code(code)
            .await?
            .ok_or(AccountError::NotFound)?;

        if user.verified {
            return Err(AccountError::Validation(
                "Account is already verified".to_string(),
            ));
        }

        user.verification_code = None;
        user.verified = true;
        self.store.update_user(user).await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserLoginResult, AccountError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !user.verified {
            return Err(AccountError::NotVerified);
        }

        let matches =
            credentials::verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id, &user.username, &user.email, &user.role)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        Ok(UserLoginResult {
            token,
            info: user.into(),
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

        let mut user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let matches = credentials::verify_password(
            old_password.to_string(),
            user.password_hash.clone(),
        )
        .await?;
        if !matches {
            return Err(AccountError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        user.password_hash = credentials::hash_password(new_password.to_string()).await?;
        self.store.update_user(user).await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<UserInfo>, AccountError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<UserInfo, AccountError> {
        let user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;
        Ok(user.into())
    }

    async fn update(&self, id: i32, req: UpdateUser) -> Result<UserInfo, AccountError> {
        let mut user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if let Some(full_name) = req.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = req.email {
            let email = email.to_lowercase();
            if email != user.email {
                if self.store.get_user_by_email(&email).await?.is_some() {
                    return Err(AccountError::DuplicateEmail);
                }
                user.email = email;
            }
        }
        if let Some(photo) = req.photo_profile {
            user.photo_profile = photo;
        }

        let updated = self.store.update_user(user).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i32, password: &str) -> Result<(), AccountError> {
        let user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let matches =
            credentials::verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            return Err(AccountError::Validation(
                "Password confirmation is incorrect".to_string(),
            ));
        }

        self.store.soft_delete_user(user).await?;
        Ok(())
    }
}
