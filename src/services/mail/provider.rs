use crate::domain::mail::OutgoingMail;
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a mail transport.
///
/// The display form is the bare description, it is surfaced to clients as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    InvalidMessage(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug {
    /// Delivers a single message. Called once per accepted submission, never retried.
    ///
    /// # Errors
    /// Returns `MailError::InvalidMessage` if the message cannot be built and
    /// `MailError::Transport` if the mail server could not be reached or refused it.
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;

    /// Checks that the transport can currently reach its server.
    ///
    /// # Errors
    /// Returns `MailError::Transport` describing why the server is unreachable.
    async fn check(&self) -> Result<(), MailError> {
        Ok(())
    }
}
