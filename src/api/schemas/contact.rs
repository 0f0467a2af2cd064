use crate::domain::submission::SubmissionInput;
use serde::Deserialize;

/// Field names used by the contact form front-end.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ContactForm> for SubmissionInput {
    fn from(form: ContactForm) -> Self {
        Self { name: form.user_name, email: form.user_email, message: form.message }
    }
}
