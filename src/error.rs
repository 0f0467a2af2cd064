use crate::domain::submission::{Rejection, SubmissionResponse};
use crate::services::mail::MailError;
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str = "Timed out while sending the E-Mail";
pub const UNEXPECTED_MESSAGE: &str = "Unexpected error while sending the E-Mail";

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Invalid input: {0}")]
    Input(Rejection),
    #[error("{0}")]
    Transmission(#[from] MailError),
    #[error("Mail transmission timed out after {0:?}")]
    Timeout(Duration),
    #[error("Mail transport failed unexpectedly: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, SubmissionError>;

impl From<SubmissionError> for SubmissionResponse {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Input(_) => Self::invalid_input(),
            SubmissionError::Transmission(e) => Self::failed(e.to_string()),
            SubmissionError::Timeout(_) => Self::failed(TIMEOUT_MESSAGE),
            SubmissionError::Unexpected(_) => Self::failed(UNEXPECTED_MESSAGE),
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        match &self {
            Self::Input(rejection) => {
                tracing::debug!(reason = %rejection.code(), detail = rejection.message(), "Submission rejected");
            }
            Self::Transmission(e) => {
                tracing::error!(error = %e, "Mail transmission failed");
            }
            Self::Timeout(after) => {
                tracing::error!(timeout = ?after, "Mail transmission timed out");
            }
            Self::Unexpected(detail) => {
                tracing::error!(detail = %detail, "Mail transport failed unexpectedly");
            }
        }

        SubmissionResponse::from(self).into_response()
    }
}
