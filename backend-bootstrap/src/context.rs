use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;

use backend_application::{AppState, Metrics, ShiftLocks};
use backend_domain::ports::{FineSettingRepository, LedgerService, SystemClock};
use backend_domain::FineSettings;
use backend_infrastructure::{AppConfig, JournalLedgerService, SqliteStore, WebhookLedgerService};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let store = if db_config.database_path == ":memory:" {
            SqliteStore::open_in_memory().await?
        } else {
            SqliteStore::open(&db_config.database_path).await?
        };
        let repo = Arc::new(store.clone());

        let ledger: Arc<dyn LedgerService> = match &runtime_config.ledger_webhook_url {
            Some(url) => {
                info!("ledger credits go to webhook {}", url);
                Arc::new(WebhookLedgerService::new(&runtime_config, url.clone())?)
            }
            None => {
                info!("no ledger webhook configured, journaling credits locally");
                Arc::new(JournalLedgerService::new(store))
            }
        };

        let settings = repo.load_settings().await?;
        if settings.is_empty() {
            info!("no fine settings stored yet, every violation is inactive");
        }

        let state = AppState {
            config: runtime_config,
            checkpoint_repo: repo.clone(),
            shift_repo: repo.clone(),
            check_in_repo: repo.clone(),
            attendance_repo: repo.clone(),
            setting_repo: repo.clone(),
            fine_repo: repo,
            ledger,
            clock: Arc::new(SystemClock),
            fine_settings: Arc::new(RwLock::new(FineSettings::new(settings))),
            shift_locks: Arc::new(ShiftLocks::default()),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
