use serde::Serialize;
use std::fmt;

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";
pub const SENT_MESSAGE: &str = "E-Mail sent successfully";

/// A contact form submission as received from the client.
///
/// Every field may be missing; presence is decided by [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl SubmissionInput {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

/// Why a submission was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    MissingInput,
    MissingName,
    MissingEmail,
    MissingMessage,
}

impl ReasonCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingInput => "MISSING_INPUT",
            Self::MissingName => "MISSING_NAME",
            Self::MissingEmail => "MISSING_EMAIL",
            Self::MissingMessage => "MISSING_MESSAGE",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejection {
    code: ReasonCode,
}

impl Rejection {
    #[must_use]
    pub const fn new(code: ReasonCode) -> Self {
        Self { code }
    }

    #[must_use]
    pub const fn code(&self) -> ReasonCode {
        self.code
    }

    /// Human readable explanation of the rejection, one per reason code.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self.code {
            ReasonCode::MissingInput => "No data was sent",
            ReasonCode::MissingName => "The \"Name\" field is empty",
            ReasonCode::MissingEmail => "The \"E-Mail\" field is empty",
            ReasonCode::MissingMessage => "No message was sent",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code)
    }
}

/// The three fields of a submission that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidSubmission<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome<'a> {
    Accepted(ValidSubmission<'a>),
    Rejected(Rejection),
}

fn present(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|value| !value.is_empty())
}

/// Checks that a submission carries a name, an e-mail and a message, in that order.
///
/// The first missing field decides the outcome. Only presence is checked,
/// the e-mail address is not parsed.
#[must_use]
pub fn validate(input: Option<&SubmissionInput>) -> ValidationOutcome<'_> {
    let Some(input) = input.filter(|input| !input.is_empty()) else {
        return ValidationOutcome::Rejected(Rejection::new(ReasonCode::MissingInput));
    };

    let Some(name) = present(input.name.as_ref()) else {
        return ValidationOutcome::Rejected(Rejection::new(ReasonCode::MissingName));
    };
    let Some(email) = present(input.email.as_ref()) else {
        return ValidationOutcome::Rejected(Rejection::new(ReasonCode::MissingEmail));
    };
    let Some(message) = present(input.message.as_ref()) else {
        return ValidationOutcome::Rejected(Rejection::new(ReasonCode::MissingMessage));
    };

    ValidationOutcome::Accepted(ValidSubmission { name, email, message })
}

/// The body returned to the client for every submission.
///
/// Only the constructors below can build one, so `success` is true exactly
/// when `status` is 200.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionResponse {
    status: u16,
    message: String,
    success: bool,
}

impl SubmissionResponse {
    #[must_use]
    pub fn sent() -> Self {
        Self { status: 200, message: SENT_MESSAGE.to_string(), success: true }
    }

    #[must_use]
    pub fn invalid_input() -> Self {
        Self { status: 400, message: INVALID_INPUT_MESSAGE.to_string(), success: false }
    }

    #[must_use]
    pub fn failed(description: impl Into<String>) -> Self {
        Self { status: 500, message: description.into(), success: false }
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }
}
