use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::json;
use sha2::Sha256;
use tracing::{info, warn};

use backend_domain::ports::LedgerService;
use backend_domain::{LedgerCredit, RuntimeConfig};

use crate::repositories::SqliteStore;

type HmacSha256 = Hmac<Sha256>;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";
pub const SIGNATURE_HEADER: &str = "X-Ronda-Signature";

/// Credits the RT wallet over HTTP. The receiver deduplicates on the
/// idempotency key, which is the fine id.
pub struct WebhookLedgerService {
    client: Client,
    url: String,
    secret: Option<String>,
}

impl WebhookLedgerService {
    pub fn new(config: &RuntimeConfig, url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            url,
            secret: config.ledger_webhook_secret.clone(),
        })
    }
}

pub fn credit_payload(credit: &LedgerCredit) -> String {
    json!({
        "fine_id": credit.fine_id,
        "member_id": credit.member_id,
        "violation_type": credit.violation_type,
        "amount": credit.amount,
        "credited_at": credit.credited_at.to_rfc3339(),
        "acting_admin": credit.acting_admin,
    })
    .to_string()
}

pub fn sign_payload(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| anyhow!("hmac init failed: {err}"))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl LedgerService for WebhookLedgerService {
    async fn credit(&self, credit: &LedgerCredit) -> Result<()> {
        let payload = credit_payload(credit);
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header(IDEMPOTENCY_HEADER, credit.fine_id.as_str());
        if let Some(secret) = &self.secret {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, &payload)?);
        }
        request
            .body(payload)
            .send()
            .await
            .with_context(|| format!("ledger webhook POST {}", self.url))?
            .error_for_status()?;
        info!("ledger credited for fine {}", credit.fine_id);
        Ok(())
    }

    async fn check_target(&self) -> Result<()> {
        let response = self.client.head(&self.url).send().await?;
        if response.status().is_server_error() {
            anyhow::bail!("ledger webhook responded {}", response.status());
        }
        Ok(())
    }
}

/// Local ledger journal used when no wallet webhook is configured.
pub struct JournalLedgerService {
    store: SqliteStore,
}

impl JournalLedgerService {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LedgerService for JournalLedgerService {
    async fn credit(&self, credit: &LedgerCredit) -> Result<()> {
        if !self.store.record_credit(credit).await? {
            warn!("ledger credit for fine {} already journaled", credit.fine_id);
        }
        Ok(())
    }

    async fn check_target(&self) -> Result<()> {
        self.store.ping_store().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{FineId, MemberId, ViolationType};
    use chrono::{TimeZone, Utc};

    fn credit() -> LedgerCredit {
        LedgerCredit {
            fine_id: FineId::from("fine-1"),
            member_id: MemberId::from("m-1"),
            violation_type: ViolationType::Late,
            amount: 20_000,
            credited_at: Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap(),
            acting_admin: "bendahara".to_string(),
        }
    }

    #[test]
    fn payload_carries_fine_identity() {
        let payload: serde_json::Value =
            serde_json::from_str(&credit_payload(&credit())).expect("json");
        assert_eq!(payload["fine_id"], "fine-1");
        assert_eq!(payload["violation_type"], "LATE");
        assert_eq!(payload["amount"], 20_000);
    }

    #[test]
    fn signature_is_hex_sha256() {
        let signature = sign_payload("secret", &credit_payload(&credit())).expect("signature");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|ch| ch.is_ascii_hexdigit()));
        let again = sign_payload("secret", &credit_payload(&credit())).expect("signature");
        assert_eq!(signature, again);
    }

    #[tokio::test]
    async fn journal_credits_once_per_fine() {
        let store = SqliteStore::open_in_memory().await.expect("store");
        let ledger = JournalLedgerService::new(store.clone());
        ledger.credit(&credit()).await.expect("first credit");
        ledger.credit(&credit()).await.expect("repeat credit");
        let credits = store.list_credits().await.expect("credits");
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].amount, 20_000);
    }
}
