//! Outbound email delivery
//!
//! `EmailTransport` is the seam the contact feature depends on; `SmtpMailer`
//! is the production implementation over an async SMTP relay.

mod smtp_mailer;

pub use smtp_mailer::{EmailTransport, MailError, OutgoingEmail, SmtpMailer};
