use crate::config::HealthConfig;
use crate::services::mail::MailTransport;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            status: meter
                .i64_gauge("contact_relay_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    transport: Arc<dyn MailTransport>,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>, config: HealthConfig) -> Self {
        Self { transport, config, metrics: Metrics::new() }
    }

    /// Checks that the mail transport can reach its server.
    ///
    /// # Errors
    /// Returns a string describing the failure if the mail server is unreachable.
    pub async fn check_mail(&self) -> Result<(), String> {
        let mail_timeout = Duration::from_millis(self.config.mail_timeout_ms);

        match timeout(mail_timeout, self.transport.check()).await {
            Ok(Ok(())) => {
                self.metrics.status.record(1, &[KeyValue::new("component", "mail")]);
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "mail")]);
                Err(format!("Mail server check failed: {e}"))
            }
            Err(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "mail")]);
                Err("Mail server check timed out".to_string())
            }
        }
    }
}
