//! Mail Delivery Abstraction
//!
//! The registration flow needs to deliver confirmation codes out-of-band.
//! Actual transport is an external collaborator; this module only defines
//! the contract plus a logging implementation for development.
//!
//! Delivery failures always propagate to the caller - a registration that
//! could not send its confirmation code is a failed registration.

use thiserror::Error;

/// An outbound mail message
#[derive(Debug, Clone)]
pub struct Mail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Mail delivery error
#[derive(Debug, Error)]
pub enum MailError {
    /// Transport reported a failure
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Mail delivery trait
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver a message. Errors must not be swallowed.
    async fn send(&self, mail: &Mail) -> Result<(), MailError>;
}

/// Development mailer that writes messages to the log instead of sending
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        tracing::info!(
            to = ?mail.to,
            from = %mail.from,
            subject = %mail.subject,
            body = %mail.body,
            "Mail delivered to log (development mailer)"
        );
        Ok(())
    }
}
