#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::RwLock;

use backend_application::commands::{checkpoint_commands, fine_setting_commands, roster_commands};
use backend_application::{AppState, Metrics, ShiftLocks};
use backend_domain::ports::{Clock, LedgerService};
use backend_domain::{
    CheckInSubmission, CheckpointDraft, CheckpointView, Coordinate, EventType, FineSettingApi,
    FineSettings, LedgerCredit, Member, MemberId, RosterEntry, RuntimeConfig, ShiftId,
    ViolationType,
};
use backend_infrastructure::SqliteStore;

pub const POST_LAT: f64 = -6.2;
pub const POST_LNG: f64 = 106.8;

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
}

pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingLedger {
    credits: Mutex<Vec<LedgerCredit>>,
    failing: AtomicBool,
}

impl RecordingLedger {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn credits(&self) -> Vec<LedgerCredit> {
        self.credits.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerService for RecordingLedger {
    async fn credit(&self, credit: &LedgerCredit) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("wallet unreachable"));
        }
        self.credits.lock().unwrap().push(credit.clone());
        Ok(())
    }

    async fn check_target(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: SqliteStore,
    pub clock: Arc<TestClock>,
    pub ledger: Arc<RecordingLedger>,
}

pub async fn harness() -> Harness {
    let store = SqliteStore::open_in_memory().await.expect("open store");
    let repo = Arc::new(store.clone());
    let clock = Arc::new(TestClock::new(at(1, 12, 0)));
    let ledger = Arc::new(RecordingLedger::default());
    let state = AppState {
        config: RuntimeConfig::default(),
        checkpoint_repo: repo.clone(),
        shift_repo: repo.clone(),
        check_in_repo: repo.clone(),
        attendance_repo: repo.clone(),
        setting_repo: repo.clone(),
        fine_repo: repo,
        ledger: ledger.clone(),
        clock: clock.clone(),
        fine_settings: Arc::new(RwLock::new(FineSettings::default())),
        shift_locks: Arc::new(ShiftLocks::default()),
        metrics: Arc::new(Metrics::default()),
    };
    Harness {
        state,
        store,
        clock,
        ledger,
    }
}

/// LATE 20.000 after 15 minutes, ABSENT 50.000, LEFT_EARLY 15.000 after 10 minutes.
pub async fn seed_settings(state: &AppState) {
    fine_setting_commands::upsert_fine_settings(
        state,
        vec![
            FineSettingApi {
                violation_type: ViolationType::Late,
                amount: 20_000,
                tolerance_minutes: 15,
                is_active: true,
            },
            FineSettingApi {
                violation_type: ViolationType::Absent,
                amount: 50_000,
                tolerance_minutes: 0,
                is_active: true,
            },
            FineSettingApi {
                violation_type: ViolationType::LeftEarly,
                amount: 15_000,
                tolerance_minutes: 10,
                is_active: true,
            },
        ],
    )
    .await
    .expect("seed settings");
}

pub async fn seed_checkpoint(state: &AppState) -> CheckpointView {
    checkpoint_commands::register_checkpoint(
        state,
        CheckpointDraft {
            name: "Pos Ronda Utara".to_string(),
            lat: POST_LAT,
            lng: POST_LNG,
            radius_meters: 50.0,
        },
    )
    .await
    .expect("register checkpoint")
}

/// Night shift 22:00 on March 1st until 04:00 on March 2nd.
pub async fn seed_night_shift(state: &AppState, checkpoint: &CheckpointView, shift_id: &str) -> ShiftId {
    seed_shift(state, checkpoint, shift_id, at(1, 22, 0), at(2, 4, 0)).await
}

pub async fn seed_shift(
    state: &AppState,
    checkpoint: &CheckpointView,
    shift_id: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> ShiftId {
    roster_commands::import_roster(
        state,
        vec![RosterEntry {
            shift_id: ShiftId::from(shift_id),
            member: Member {
                id: MemberId::from("warga-07"),
                name: "Pak Budi".to_string(),
                photo_url: None,
            },
            checkpoint_id: checkpoint.checkpoint.id.clone(),
            starts_at,
            ends_at,
        }],
    )
    .await
    .expect("import roster");
    ShiftId::from(shift_id)
}

pub fn scan(
    shift_id: &ShiftId,
    event_type: EventType,
    coordinate: Coordinate,
    token: &str,
    at: DateTime<Utc>,
) -> CheckInSubmission {
    CheckInSubmission {
        shift_id: shift_id.clone(),
        event_type,
        coordinate: Some(coordinate),
        qr_token: token.to_string(),
        client_timestamp: at,
    }
}

pub fn at_post() -> Coordinate {
    Coordinate {
        lat: POST_LAT,
        lng: POST_LNG,
    }
}

/// Roughly `meters` due north of the post.
pub fn north_of_post(meters: f64) -> Coordinate {
    Coordinate {
        lat: POST_LAT + meters / 111_195.0,
        lng: POST_LNG,
    }
}

pub fn after(at: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    at + Duration::minutes(minutes)
}

pub fn after_seconds(at: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    at + Duration::seconds(seconds)
}
