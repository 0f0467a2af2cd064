use crate::domain::mail::OutgoingMail;
use crate::services::mail::{MailError, MailTransport};
use async_trait::async_trait;

/// Writes messages to the log instead of delivering them. Used when no SMTP server is configured.
#[derive(Debug, Default)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            from = %mail.from,
            subject = %mail.subject,
            body_len = mail.body.len(),
            "STUB: Logging mail instead of sending it"
        );
        Ok(())
    }
}
