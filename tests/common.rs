#![allow(dead_code, unreachable_pub, missing_debug_implementations, clippy::unwrap_used, clippy::panic)]
use async_trait::async_trait;
use contact_relay::api::{MgmtState, app_router, mgmt_router};
use contact_relay::config::{Config, HealthConfig, LogFormat, MailConfig, ServerConfig, TelemetryConfig};
use contact_relay::domain::mail::OutgoingMail;
use contact_relay::services::mail::{MailError, MailTransport};
use contact_relay::AppBuilder;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("contact_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("lettre=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            max_body_bytes: 4096,
            allowed_origins: vec!["https://form.example".to_string()],
        },
        mail: MailConfig {
            smtp_url: None,
            smtp_username: None,
            smtp_password: None,
            sender: "Contact form <noreply@example.com>".to_string(),
            recipient: "owner@example.com".to_string(),
            subject: "New contact form submission".to_string(),
            send_timeout_secs: 2,
        },
        health: HealthConfig { mail_timeout_ms: 500 },
        telemetry: TelemetryConfig { otlp_endpoint: None, log_format: LogFormat::Text },
    }
}

#[derive(Debug, Clone)]
pub enum StubBehavior {
    Succeed,
    Fail(String),
    Panic,
    Unreachable,
}

/// Mail transport that records what it is asked to send.
#[derive(Debug)]
pub struct StubMailTransport {
    behavior: StubBehavior,
    sent: Mutex<Vec<OutgoingMail>>,
}

impl StubMailTransport {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self { behavior, sent: Mutex::new(Vec::new()) })
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for StubMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        match &self.behavior {
            StubBehavior::Succeed => Ok(()),
            StubBehavior::Fail(description) => Err(MailError::Transport(description.clone())),
            StubBehavior::Panic => panic!("stub transport panicked"),
            StubBehavior::Unreachable => Err(MailError::Transport("Connection refused".to_string())),
        }
    }

    async fn check(&self) -> Result<(), MailError> {
        match &self.behavior {
            StubBehavior::Unreachable => Err(MailError::Transport("Connection refused".to_string())),
            _ => Ok(()),
        }
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn(transport: Arc<dyn MailTransport>) -> Self {
        Self::spawn_with_config(get_test_config(), transport).await
    }

    pub async fn spawn_with_config(config: Config, transport: Arc<dyn MailTransport>) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_mail_transport(transport).build().unwrap();
        let router = app_router(&config, app.services);
        let mgmt = mgmt_router(MgmtState { health_service: app.health_service });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config }
    }

    pub fn contact_url(&self) -> String {
        format!("{}/api/contact", self.server_url)
    }

    pub async fn submit_json(&self, body: &serde_json::Value) -> (reqwest::StatusCode, serde_json::Value) {
        let resp = self.client.post(self.contact_url()).json(body).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }
}

pub fn valid_submission() -> serde_json::Value {
    serde_json::json!({ "user_name": "Ada", "user_email": "ada@example.com", "message": "hi" })
}
