use std::sync::Arc;

use backend_domain::ports::{
    AttendanceRepository, CheckInRepository, CheckpointRepository, Clock, FineRepository,
    FineSettingRepository, LedgerService, ShiftRepository,
};
use backend_domain::{FineSettings, RuntimeConfig};
use tokio::sync::RwLock;

use crate::{Metrics, ShiftLocks};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub checkpoint_repo: Arc<dyn CheckpointRepository>,
    pub shift_repo: Arc<dyn ShiftRepository>,
    pub check_in_repo: Arc<dyn CheckInRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub setting_repo: Arc<dyn FineSettingRepository>,
    pub fine_repo: Arc<dyn FineRepository>,
    pub ledger: Arc<dyn LedgerService>,
    pub clock: Arc<dyn Clock>,
    pub fine_settings: Arc<RwLock<FineSettings>>,
    pub shift_locks: Arc<ShiftLocks>,
    pub metrics: Arc<Metrics>,
}
