//! Password hashing, verification codes, and OTP generation.
//!
//! Bcrypt is CPU-bound, so hashing and verification run on the blocking
//! thread pool.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .context("Hashing task panicked")?
        .context("Failed to hash password")
}

pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Verification task panicked")?
        .context("Failed to verify password")
}

/// Random 20-character alphanumeric token, base64-encoded so it is safe to
/// embed in verification URLs.
#[must_use]
pub fn generate_verification_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    let raw: String = (0..20)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    URL_SAFE_NO_PAD.encode(raw)
}

/// Six-digit one-time password for the reset flow.
#[must_use]
pub fn generate_otp() -> i32 {
    rand::rng().random_range(100_000..=999_999)
}
