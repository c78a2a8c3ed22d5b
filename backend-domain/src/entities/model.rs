// Runtime configuration handed to the application layer

use chrono::TimeDelta;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub ledger_webhook_url: Option<String>,
    pub ledger_webhook_secret: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub evaluation_interval_seconds: u64,
    pub max_clock_skew_seconds: u64,
    pub early_arrival_minutes: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
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

impl RuntimeConfig {
    pub fn max_clock_skew(&self) -> TimeDelta {
        i64::try_from(self.max_clock_skew_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn early_arrival(&self) -> TimeDelta {
        i64::try_from(self.early_arrival_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .unwrap_or(TimeDelta::MAX)
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: String,
}
