use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::config::SmtpConfig;

/// Connection, greeting and socket timeout for the SMTP session
const SMTP_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP is not configured, missing: {0}")]
    NotConfigured(String),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP connection failed: {0}")]
    Connection(String),

    #[error("SMTP delivery failed: {0}")]
    Delivery(String),
}

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub bcc: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Check that the relay is reachable and accepts our credentials
    async fn verify(&self) -> Result<(), MailError>;

    /// Deliver a single message, one attempt
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// SMTP relay client built from `SMTP_*` settings
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer, failing with `NotConfigured` when required settings are absent.
    ///
    /// `secure = true` uses implicit TLS; otherwise the session is upgraded with STARTTLS.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let missing = config.missing_vars();
        let (Some(host), Some(port), Some(user), Some(password)) = (
            config.host.as_deref(),
            config.port,
            config.user.as_deref(),
            config.password.as_deref(),
        ) else {
            return Err(MailError::NotConfigured(missing.join(", ")));
        };

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| MailError::Connection(e.to_string()))?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .timeout(Some(SMTP_CONNECTION_TIMEOUT))
            .build();

        let from = parse_mailbox(user)?;

        info!(
            "SMTP mailer configured for {}:{} (implicit TLS: {})",
            host, port, config.secure
        );

        Ok(Self { transport, from })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Connection(
                "server did not accept the connection".to_string(),
            )),
            Err(e) => Err(MailError::Connection(e.to_string())),
        }
    }

    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject);

        if let Some(bcc) = email.bcc.as_deref() {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        let message = builder
            .multipart(MultiPart::alternative_plain_html(
                email.text_body,
                email.html_body,
            ))
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        debug!("Email delivered to {}", email.to);
        Ok(())
    }
}
