use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::LedgerCredit;

/// External bookkeeping collaborator credited when a fine is paid. The fine id
/// doubles as idempotency key.
#[async_trait]
pub trait LedgerService: Send + Sync {
    async fn credit(&self, credit: &LedgerCredit) -> anyhow::Result<()>;
    async fn check_target(&self) -> anyhow::Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
