use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use healthpal_core::constants::DEFAULT_DONATION_MAX_ATTEMPTS;

use crate::auth::decode_secret_key;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("expected 'text' or 'json', got '{}'", other),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// HS256 key shared with the identity provider that issues bearer tokens.
    pub jwt_secret: Vec<u8>,
    pub donation_max_attempts: u32,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("HP_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid HP_LISTEN_ADDR")?;
        let db_path = std::env::var("HP_DB_PATH").unwrap_or_else(|_| "./db/healthpal.db".into());
        let cors_allow = parse_origins(
            &std::env::var("HP_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        );
        let timeout_ms: u64 = std::env::var("HP_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .context("Invalid HP_REQUEST_TIMEOUT_MS")?;
        let jwt_secret = std::env::var("HP_JWT_SECRET")
            .context("HP_JWT_SECRET must be set")
            .and_then(|raw| decode_secret_key(&raw).context("Invalid HP_JWT_SECRET"))?;
        let donation_max_attempts: u32 = match std::env::var("HP_DONATION_MAX_ATTEMPTS") {
            Ok(raw) => raw
                .parse()
                .context("Invalid HP_DONATION_MAX_ATTEMPTS")?,
            Err(_) => DEFAULT_DONATION_MAX_ATTEMPTS,
        };
        if donation_max_attempts == 0 {
            anyhow::bail!("HP_DONATION_MAX_ATTEMPTS must be at least 1");
        }
        let log_format = match std::env::var("HP_LOG_FORMAT") {
            Ok(raw) => raw.parse().context("Invalid HP_LOG_FORMAT")?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            donation_max_attempts,
            log_format,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
