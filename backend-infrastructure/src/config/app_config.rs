use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

use crate::config::validate_webhook_url;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub database_path: String,
    pub ledger_webhook_url: Option<String>,
    pub ledger_webhook_secret: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub evaluation_interval_seconds: u64,
    pub max_clock_skew_seconds: u64,
    pub early_arrival_minutes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            database_path: "./ronda.sqlite".to_string(),
            ledger_webhook_url: None,
            ledger_webhook_secret: None,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            evaluation_interval_seconds: 60,
            max_clock_skew_seconds: 300,
            early_arrival_minutes: 60,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("RONDA_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_token = normalize_secret(self.api_token.take());
        self.ledger_webhook_url = normalize_secret(self.ledger_webhook_url.take());
        self.ledger_webhook_secret = normalize_secret(self.ledger_webhook_secret.take());
        self.database_path = self.database_path.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if self.database_path == ":memory:" {
            return;
        }
        self.database_path = resolve_path(base, &self.database_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.database_path.is_empty() {
            return Err(anyhow!("database_path must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.evaluation_interval_seconds == 0 {
            return Err(anyhow!("evaluation_interval_seconds must be greater than 0"));
        }
        if let Some(url) = &self.ledger_webhook_url {
            validate_webhook_url(url)?;
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            ledger_webhook_url: self.ledger_webhook_url.clone(),
            ledger_webhook_secret: self.ledger_webhook_secret.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            evaluation_interval_seconds: self.evaluation_interval_seconds,
            max_clock_skew_seconds: self.max_clock_skew_seconds,
            early_arrival_minutes: self.early_arrival_minutes,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            database_path: self.database_path.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("RONDA_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("RONDA_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("RONDA_DATABASE_PATH") {
            self.database_path = value;
        }
        if let Ok(value) = env::var("RONDA_LEDGER_WEBHOOK_URL") {
            self.ledger_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("RONDA_LEDGER_WEBHOOK_SECRET") {
            self.ledger_webhook_secret = Some(value);
        }
        if let Ok(value) = env::var("RONDA_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("RONDA_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("RONDA_EVALUATION_INTERVAL_SECONDS") {
            self.evaluation_interval_seconds =
                value.parse().unwrap_or(self.evaluation_interval_seconds);
        }
        if let Ok(value) = env::var("RONDA_MAX_CLOCK_SKEW_SECONDS") {
            self.max_clock_skew_seconds = value.parse().unwrap_or(self.max_clock_skew_seconds);
        }
        if let Ok(value) = env::var("RONDA_EARLY_ARRIVAL_MINUTES") {
            self.early_arrival_minutes = value.parse().unwrap_or(self.early_arrival_minutes);
        }
    }
}

fn normalize_secret(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
