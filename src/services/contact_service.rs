use crate::config::MailConfig;
use crate::domain::mail::OutgoingMail;
use crate::domain::submission::{SubmissionInput, ValidSubmission, ValidationOutcome, validate};
use crate::error::{Result, SubmissionError};
use crate::services::mail::MailTransport;
use futures::FutureExt;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

#[derive(Clone, Debug)]
struct Metrics {
    submissions_total: Counter<u64>,
    send_duration_seconds: Histogram<f64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            submissions_total: meter
                .u64_counter("contact_submissions_total")
                .with_description("Contact form submissions by outcome")
                .build(),
            send_duration_seconds: meter
                .f64_histogram("contact_mail_send_duration_seconds")
                .with_description("Time spent handing a submission to the mail transport")
                .with_unit("s")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContactService {
    transport: Arc<dyn MailTransport>,
    config: MailConfig,
    metrics: Metrics,
}

impl ContactService {
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>, config: MailConfig) -> Self {
        Self { transport, config, metrics: Metrics::new() }
    }

    /// Validates a submission and relays it to the configured recipient.
    ///
    /// The transport is called at most once, bounded by the configured send timeout.
    ///
    /// # Errors
    /// Returns `SubmissionError::Input` if a required field is missing,
    /// `SubmissionError::Transmission` if the transport reports a failure,
    /// `SubmissionError::Timeout` if it does not finish in time and
    /// `SubmissionError::Unexpected` if it panics.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, input: Option<SubmissionInput>) -> Result<()> {
        let valid = match validate(input.as_ref()) {
            ValidationOutcome::Accepted(valid) => valid,
            ValidationOutcome::Rejected(rejection) => {
                self.metrics.submissions_total.add(
                    1,
                    &[KeyValue::new("outcome", "rejected"), KeyValue::new("reason", rejection.code().as_str())],
                );
                return Err(SubmissionError::Input(rejection));
            }
        };

        let mail = self.compose(valid);
        let result = self.transmit(mail).await;

        let outcome = match &result {
            Ok(()) => "sent",
            Err(SubmissionError::Timeout(_)) => "timeout",
            Err(_) => "failed",
        };
        self.metrics.submissions_total.add(1, &[KeyValue::new("outcome", outcome)]);

        result
    }

    fn compose(&self, submission: ValidSubmission<'_>) -> OutgoingMail {
        tracing::debug!(message_len = submission.message.len(), "Relaying submission");
        OutgoingMail {
            to: self.config.recipient.clone(),
            from: self.config.sender.clone(),
            subject: self.config.subject.clone(),
            body: submission.message.to_string(),
        }
    }

    async fn transmit(&self, mail: OutgoingMail) -> Result<()> {
        let limit = Duration::from_secs(self.config.send_timeout_secs);
        let start = Instant::now();

        let attempt = AssertUnwindSafe(self.transport.send(mail)).catch_unwind();
        let result = match timeout(limit, attempt).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(SubmissionError::Transmission(e)),
            Ok(Err(panic)) => Err(SubmissionError::Unexpected(panic_message(panic.as_ref()))),
            Err(_) => Err(SubmissionError::Timeout(limit)),
        };

        self.metrics.send_duration_seconds.record(start.elapsed().as_secs_f64(), &[]);
        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::{ReasonCode, SubmissionResponse};
    use crate::services::mail::MailError;
    use async_trait::async_trait;
    use std::io;
    use std::sync::Mutex;

    #[derive(Debug)]
    enum Behavior {
        Succeed,
        Fail(&'static str),
        Panic,
        Hang,
    }

    #[derive(Debug)]
    struct FakeTransport {
        behavior: Behavior,
        sent: Mutex<Vec<OutgoingMail>>,
    }

    impl FakeTransport {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self { behavior, sent: Mutex::new(Vec::new()) })
        }

        fn sent(&self) -> Vec<OutgoingMail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn send(&self, mail: OutgoingMail) -> std::result::Result<(), MailError> {
            self.sent.lock().unwrap().push(mail);
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail(description) => Err(MailError::Transport(description.to_string())),
                Behavior::Panic => panic!("transport exploded"),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    fn config() -> MailConfig {
        MailConfig {
            smtp_url: None,
            smtp_username: None,
            smtp_password: None,
            sender: "Contact form <noreply@example.com>".to_string(),
            recipient: "owner@example.com".to_string(),
            subject: "New contact form submission".to_string(),
            send_timeout_secs: 1,
        }
    }

    fn valid_input() -> SubmissionInput {
        SubmissionInput { name: Some("Ada".into()), email: Some("ada@example.com".into()), message: Some("hi".into()) }
    }

    async fn respond(transport: Arc<FakeTransport>, input: Option<SubmissionInput>) -> SubmissionResponse {
        let service = ContactService::new(transport, config());
        service.submit(input).await.map_or_else(SubmissionResponse::from, |()| SubmissionResponse::sent())
    }

    #[tokio::test]
    async fn test_rejected_input_never_reaches_transport() {
        let transport = FakeTransport::new(Behavior::Succeed);
        let service = ContactService::new(transport.clone(), config());
        let input = SubmissionInput { name: Some(String::new()), ..valid_input() };

        let err = service.submit(Some(input)).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Input(r) if r.code() == ReasonCode::MissingName));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_absent_input_is_invalid() {
        let response = respond(FakeTransport::new(Behavior::Succeed), None).await;
        assert_eq!(response, SubmissionResponse::invalid_input());
    }

    #[tokio::test]
    async fn test_accepted_submission_is_relayed_with_configured_envelope() {
        let transport = FakeTransport::new(Behavior::Succeed);

        let response = respond(transport.clone(), Some(valid_input())).await;

        assert_eq!(response, SubmissionResponse::sent());
        assert_eq!(
            transport.sent(),
            vec![OutgoingMail {
                to: "owner@example.com".into(),
                from: "Contact form <noreply@example.com>".into(),
                subject: "New contact form submission".into(),
                body: "hi".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_verbatim() {
        let response = respond(FakeTransport::new(Behavior::Fail("Connection refused")), Some(valid_input())).await;
        assert_eq!(response, SubmissionResponse::failed("Connection refused"));
    }

    #[tokio::test]
    async fn test_transport_panic_is_contained() {
        let transport = FakeTransport::new(Behavior::Panic);
        let service = ContactService::new(transport, config());

        let err = service.submit(Some(valid_input())).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Unexpected(ref detail) if detail == "transport exploded"));
        assert_eq!(SubmissionResponse::from(err).status(), 500);
    }

    #[tokio::test]
    async fn test_hanging_transport_times_out() {
        let transport = FakeTransport::new(Behavior::Hang);
        let service = ContactService::new(transport, config());

        let err = service.submit(Some(valid_input())).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Timeout(limit) if limit == Duration::from_secs(1)));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_compose_keeps_submitter_identity_out_of_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let service = ContactService::new(FakeTransport::new(Behavior::Succeed), config());
        let input = valid_input();

        let ValidationOutcome::Accepted(valid) = validate(Some(&input)) else {
            panic!("valid input was rejected");
        };
        tracing::subscriber::with_default(subscriber, || service.compose(valid));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Relaying submission"), "{output}");
        assert!(!output.contains("Ada"), "{output}");
        assert!(!output.contains("ada@example.com"), "{output}");
    }
}
