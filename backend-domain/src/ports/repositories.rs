use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    AttendanceRecord,
    CheckInEvent,
    Checkpoint,
    Fine,
    FineSetting,
    FineStatus,
    FineSummary,
    FineView,
    Member,
    PaymentTransition,
    RejectedCheckIn,
    Shift,
};
use crate::value_objects::{CheckpointId, FineId, ShiftId};

#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    async fn insert_checkpoint(&self, checkpoint: &Checkpoint) -> anyhow::Result<()>;
    /// Returns false when the checkpoint does not exist.
    async fn update_checkpoint(&self, checkpoint: &Checkpoint) -> anyhow::Result<bool>;
    async fn fetch_checkpoint(&self, id: &CheckpointId) -> anyhow::Result<Option<Checkpoint>>;
    async fn list_checkpoints(&self) -> anyhow::Result<Vec<Checkpoint>>;
    /// Deletes only when no shift ending after `now` references the checkpoint.
    async fn delete_checkpoint(
        &self,
        id: &CheckpointId,
        now: DateTime<Utc>,
    ) -> anyhow::Result<CheckpointDeletion>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointDeletion {
    Deleted,
    NotFound,
    InUse { future_shifts: u64 },
}

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Upserts members and shifts in one transaction.
    async fn upsert_roster(&self, members: &[Member], shifts: &[Shift]) -> anyhow::Result<()>;
    async fn fetch_shift(&self, id: &ShiftId) -> anyhow::Result<Option<Shift>>;
    async fn list_shifts(
        &self,
        date: Option<NaiveDate>,
        member_id: Option<&str>,
    ) -> anyhow::Result<Vec<Shift>>;
    /// Stored shifts of `member_id` overlapping the window, excluding `except`.
    async fn find_overlapping(
        &self,
        member_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        except: &ShiftId,
    ) -> anyhow::Result<Vec<Shift>>;
    /// Ended shifts with no finalized attendance record.
    async fn list_unfinalized_ended(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<Shift>>;
}

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    async fn insert_event(&self, event: &CheckInEvent) -> anyhow::Result<()>;
    async fn insert_rejected(&self, rejected: &RejectedCheckIn) -> anyhow::Result<()>;
    /// Accepted events ordered by occurred_at, then received_at.
    async fn list_events(&self, shift_id: &ShiftId) -> anyhow::Result<Vec<CheckInEvent>>;
    async fn list_rejected(&self, shift_id: &ShiftId) -> anyhow::Result<Vec<RejectedCheckIn>>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn save_record(&self, record: &AttendanceRecord) -> anyhow::Result<()>;
    async fn fetch_record(&self, shift_id: &ShiftId) -> anyhow::Result<Option<AttendanceRecord>>;
}

#[async_trait]
pub trait FineSettingRepository: Send + Sync {
    async fn load_settings(&self) -> anyhow::Result<Vec<FineSetting>>;
    /// Overwrites the stored value for every type present in `settings`.
    async fn save_settings(&self, settings: &[FineSetting]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait FineRepository: Send + Sync {
    /// Inserts unless a fine for the same shift exists; returns the fine that
    /// is stored for the shift afterwards and whether it was created now.
    async fn insert_fine_if_absent(&self, fine: &Fine) -> anyhow::Result<(Fine, bool)>;
    async fn fetch_fine(&self, id: &FineId) -> anyhow::Result<Option<Fine>>;
    async fn fetch_fine_for_shift(&self, shift_id: &ShiftId) -> anyhow::Result<Option<Fine>>;
    /// Most recent first.
    async fn list_fines(&self, status: Option<FineStatus>) -> anyhow::Result<Vec<FineView>>;
    async fn fetch_summary(&self) -> anyhow::Result<FineSummary>;
    /// Compare-and-set UNPAID -> PAID.
    async fn mark_paid(
        &self,
        id: &FineId,
        paid_at: DateTime<Utc>,
        paid_by: &str,
    ) -> anyhow::Result<PaymentTransition>;
    /// Compare-and-set PAID -> UNPAID, only for the transition stamped `paid_at`.
    async fn revert_payment(&self, id: &FineId, paid_at: DateTime<Utc>) -> anyhow::Result<bool>;
    async fn ping(&self) -> anyhow::Result<()>;
}
