//! JWT issuing and verification.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    Invalid,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Claims carried in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub authorized: bool,
    pub exp: usize,
}

/// HS256 signer/verifier with a fixed time-to-live.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(
        &self,
        id: i32,
        username: &str,
        email: &str,
        role: &str,
    ) -> Result<String, TokenError> {
        let exp = chrono::Utc::now() + self.ttl;
        let claims = Claims {
            id,
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            authorized: true,
            exp: usize::try_from(exp.timestamp())
                .map_err(|e| TokenError::Internal(e.to_string()))?,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        if !data.claims.authorized {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }

    #[must_use]
    pub const fn ttl(&self) -> chrono::Duration {
        self.ttl
    }
}
