//! Outbound email.
//!
//! Email delivery is best-effort: callers log a warning on failure and the
//! request still succeeds.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: String) -> Result<()>;
}

/// SMTP delivery via lettre. The transport is blocking, so sends run on the
/// blocking thread pool.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> Result<Self> {
        let transport = SmtpTransport::relay(&cfg.host)
            .context("Failed to build SMTP transport")?
            .port(cfg.port)
            .credentials(Credentials::new(
                cfg.username.clone(),
                cfg.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: format!("{} <{}>", cfg.from_name, cfg.from_address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("Invalid from address")?)
            .to(to.parse().context("Invalid recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .context("Failed to build email")?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .context("Email task panicked")?
            .context("Failed to send email")?;

        Ok(())
    }
}

/// Drop-in mailer for tests and SMTP-less deployments.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: String) -> Result<()> {
        tracing::debug!("Email delivery disabled, skipping '{}' to {}", subject, to);
        Ok(())
    }
}

pub fn verification_email(recipient_name: &str, verify_url: &str) -> (String, String) {
    let subject = "Verify your account".to_string();
    let body = format!(
        "<p>Hi {recipient_name},</p>\
         <p>Thanks for registering. Click the link below to verify your account:</p>\
         <p><a href=\"{verify_url}\">{verify_url}</a></p>\
         <p>If you did not register, you can ignore this email.</p>"
    );
    (subject, body)
}

pub fn otp_email(recipient_name: &str, otp: i32) -> (String, String) {
    let subject = "Your password reset code".to_string();
    let body = format!(
        "<p>Hi {recipient_name},</p>\
         <p>Your one-time password reset code is:</p>\
         <h2>{otp}</h2>\
         <p>If you did not request a reset, you can ignore this email.</p>"
    );
    (subject, body)
}
