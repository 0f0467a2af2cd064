use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub mail: MailConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "CONTACT_RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CONTACT_RELAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "CONTACT_RELAY_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// How long to wait for in-flight requests after a shutdown signal
    #[arg(long, env = "CONTACT_RELAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "CONTACT_RELAY_MAX_BODY_BYTES", default_value_t = 65_536)]
    pub max_body_bytes: usize,

    /// Comma-separated list of origins allowed to submit the form from a browser
    #[arg(long, env = "CONTACT_RELAY_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MailConfig {
    /// SMTP server URL, e.g. smtps://smtp.example.com:465. Mail is only logged when unset.
    #[arg(long, env = "CONTACT_RELAY_SMTP_URL")]
    pub smtp_url: Option<String>,

    /// SMTP username (overrides credentials embedded in the URL)
    #[arg(long, env = "CONTACT_RELAY_SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "CONTACT_RELAY_SMTP_PASSWORD")]
    pub smtp_password: Option<String>,

    /// Mailbox the submissions are sent from
    #[arg(long, env = "CONTACT_RELAY_SENDER", default_value = "Contact form <noreply@localhost>")]
    pub sender: String,

    /// Mailbox the submissions are delivered to
    #[arg(long, env = "CONTACT_RELAY_RECIPIENT")]
    pub recipient: String,

    /// Subject line of every relayed message
    #[arg(long, env = "CONTACT_RELAY_SUBJECT", default_value = "New contact form submission")]
    pub subject: String,

    /// Upper bound on a single mail transmission
    #[arg(long, env = "CONTACT_RELAY_SEND_TIMEOUT_SECS", default_value_t = 10)]
    pub send_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the mail transport readiness check
    #[arg(long, env = "CONTACT_RELAY_HEALTH_MAIL_TIMEOUT_MS", default_value_t = 2000)]
    pub mail_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP collector endpoint (HTTP). Export is disabled when unset.
    #[arg(long, env = "CONTACT_RELAY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "CONTACT_RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
