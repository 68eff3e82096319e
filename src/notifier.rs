//! Email notifier
//!
//! Mail delivery itself is an external collaborator; the portal only knows
//! the [`MailTransport`] seam. The default transport writes the message to
//! the log, which keeps the portal usable without an SMTP relay.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Subject line of the awareness reminder
const REMINDER_SUBJECT: &str = "REMINDER: EMAIL AWARENESS (CYBERSECURITY RELATED)";

/// Body of the awareness reminder
const REMINDER_BODY: &str = "This is your periodic reminder to stay alert for \
phishing attempts. Verify the sender address before opening attachments and \
report suspicious messages to the operations team.";

/// Notifier errors
#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not deliver the message
    #[error("Mail transport error: {0}")]
    Transport(String),
}

/// A templated outbound email
#[derive(Debug)]
pub struct EmailMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Delivery seam for outbound mail
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), Error>;
}

/// Sends templated mail through a [`MailTransport`]
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    /// Create a notifier over a given transport
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Create a notifier that only logs outbound mail
    pub fn log_only() -> Self {
        Self::new(Arc::new(LogTransport))
    }

    /// Send the awareness reminder to a single recipient
    pub async fn send_reminder(&self, recipient: &str) -> Result<(), Error> {
        let message = EmailMessage {
            recipient: recipient.to_string(),
            subject: REMINDER_SUBJECT.to_string(),
            body: REMINDER_BODY.to_string(),
        };

        self.transport.send(&message).await
    }
}

/// Transport that records the message in the log instead of delivering it
struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), Error> {
        tracing::info!(
            recipient = %message.recipient,
            subject = %message.subject,
            "Outbound mail (log transport, not delivered)"
        );

        Ok(())
    }
}
