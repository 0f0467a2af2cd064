use crate::config::MailConfig;
use crate::services::mail::MailTransport;
use anyhow::Context;
use lettre::message::Mailbox;
use std::sync::Arc;

pub mod log;
pub mod smtp;

/// Selects the mail transport for the configured environment.
///
/// Sender and recipient are checked here so a typo fails the boot instead of every submission.
///
/// # Errors
/// Returns an error if a mailbox does not parse or the SMTP URL is invalid.
pub fn build_transport(config: &MailConfig) -> anyhow::Result<Arc<dyn MailTransport>> {
    config.sender.parse::<Mailbox>().with_context(|| format!("invalid sender mailbox {:?}", config.sender))?;
    config.recipient.parse::<Mailbox>().with_context(|| format!("invalid recipient mailbox {:?}", config.recipient))?;

    match &config.smtp_url {
        Some(url) => {
            let transport = smtp::SmtpMailTransport::new(url, config)?;
            tracing::info!(transport = ?transport, "using SMTP mail transport");
            Ok(Arc::new(transport))
        }
        None => {
            tracing::warn!("no SMTP URL configured, submissions will only be logged");
            Ok(Arc::new(log::LogMailTransport))
        }
    }
}
