pub mod provider;

pub use provider::{MailError, MailTransport};
