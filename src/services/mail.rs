//! Outgoing email over SMTP

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;

use crate::config::EmailConfig;
use crate::{Error, Result};

/// Port using implicit TLS; anything else negotiates STARTTLS
const SMTPS_PORT: u16 = 465;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Whether `address` looks like `local@domain.tld`
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address.trim())
}

/// A plain-text message to one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers email
#[async_trait(?Send)]
pub trait Mailer {
    /// Send `email` from the configured account
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// SMTP submission with TLS and login
pub struct SmtpMailer {
    from: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a transport for the configured account
    ///
    /// # Errors
    ///
    /// Returns [`Error::Email`] if the TLS parameters for the host are invalid
    pub fn new(config: &EmailConfig, timeout: Duration) -> Result<Self> {
        let builder = if config.smtp_port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| Error::Email(e.to_string()))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.address.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        tracing::debug!(host = %config.smtp_host, port = config.smtp_port, "smtp transport ready");

        Ok(Self {
            from: config.address.clone(),
            transport,
        })
    }
}

#[async_trait(?Send)]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message = build_message(&self.from, email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| Error::Email(e.to_string()))?;
        tracing::info!(to = %email.to, "email sent");
        Ok(())
    }
}

fn build_message(from: &str, email: &OutgoingEmail) -> Result<Message> {
    let from = from
        .parse()
        .map_err(|e| Error::Email(format!("invalid sender {from}: {e}")))?;
    let to = email
        .to
        .trim()
        .parse()
        .map_err(|e| Error::Email(format!("invalid recipient {}: {e}", email.to)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| Error::Email(e.to_string()))
}
