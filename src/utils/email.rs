//! Outbound mail.
//!
//! Services depend on the [`Mailer`] trait so tests can substitute a mock.
//! [`SmtpMailer`] sends through lettre's blocking SMTP transport on the
//! blocking thread pool; [`LogMailer`] only records the message and is used
//! when `SMTP_ENABLED` is false.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use schoolhub_config::EmailConfig;
use tracing::{info, instrument};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),

    #[error("Mail task failed: {0}")]
    Join(String),
}

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a plain-text message from `from` to every address in `to`.
    async fn send(
        &self,
        subject: &str,
        body: &str,
        from: &str,
        to: Vec<String>,
    ) -> Result<(), MailError>;
}

/// Mailer matching `config`: SMTP when enabled, log-only otherwise.
pub fn mailer_from_config(config: &EmailConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        info!(host = %config.smtp_host, port = config.smtp_port, "SMTP mailer enabled");
        Arc::new(SmtpMailer::new(config.clone()))
    } else {
        info!("SMTP disabled, outgoing mail will only be logged");
        Arc::new(LogMailer)
    }
}

pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| MailError::Transport(format!("Failed to create SMTP relay: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| {
        MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, body), fields(recipients = to.len()))]
    async fn send(
        &self,
        subject: &str,
        body: &str,
        from: &str,
        to: Vec<String>,
    ) -> Result<(), MailError> {
        let mut builder = Message::builder().from(parse_mailbox(from)?).subject(subject);
        for recipient in &to {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let email = builder
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mailer = self.transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| MailError::Join(e.to_string()))?
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Development mailer. Message bodies are not logged since they can carry
/// credentials.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        subject: &str,
        _body: &str,
        from: &str,
        to: Vec<String>,
    ) -> Result<(), MailError> {
        info!(subject, from, to = ?to, "Mail delivery disabled, message dropped");
        Ok(())
    }
}
