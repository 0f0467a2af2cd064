use crate::config::MailConfig;
use crate::domain::mail::OutgoingMail;
use crate::services::mail::{MailError, MailTransport};
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;

pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    server: String,
}

impl SmtpMailTransport {
    /// Builds a pooled SMTP transport from a `smtp://` or `smtps://` URL.
    ///
    /// Credentials from `config` take precedence over the ones embedded in the URL.
    /// The command timeout stays at lettre's default; callers bound the whole send.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed.
    pub fn new(url: &str, config: &MailConfig) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?;

        if let Some(username) = &config.smtp_username {
            builder = builder
                .credentials(Credentials::new(username.clone(), config.smtp_password.clone().unwrap_or_default()));
        }

        Ok(Self { transport: builder.build(), server: redact_credentials(url) })
    }

    fn build_message(mail: OutgoingMail) -> Result<Message, MailError> {
        let from: Mailbox =
            mail.from.parse().map_err(|e| MailError::InvalidMessage(format!("Invalid sender address: {e}")))?;
        let to: Mailbox =
            mail.to.parse().map_err(|e| MailError::InvalidMessage(format!("Invalid recipient address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| MailError::InvalidMessage(e.to_string()))
    }
}

impl fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailTransport").field("server", &self.server).finish_non_exhaustive()
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    #[tracing::instrument(err, skip_all, fields(server = %self.server))]
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = Self::build_message(mail)?;
        let response = self.transport.send(message).await.map_err(|e| MailError::Transport(e.to_string()))?;
        tracing::debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }

    async fn check(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Transport(format!("SMTP server {} did not answer NOOP", self.server))),
            Err(e) => Err(MailError::Transport(e.to_string())),
        }
    }
}

/// Drops the userinfo part of a URL so it can be logged.
fn redact_credentials(url: &str) -> String {
    match (url.split_once("://"), url.rfind('@')) {
        (Some((scheme, _)), Some(at)) => format!("{scheme}://{}", &url[at + 1..]),
        _ => url.to_string(),
    }
}
