use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use backend_domain::ports::AttendanceRepository;
use backend_domain::{AttendanceRecord, ShiftId};

use crate::repositories::sqlite_store::{parse_column, time_column};
use crate::repositories::SqliteStore;

#[async_trait]
impl AttendanceRepository for SqliteStore {
    async fn save_record(&self, record: &AttendanceRecord) -> anyhow::Result<()> {
        let record = record.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO attendance_records (shift_id, verdict, evaluated_at, finalized)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(shift_id) DO UPDATE SET
                    verdict = excluded.verdict,
                    evaluated_at = excluded.evaluated_at,
                    finalized = excluded.finalized",
                params![
                    record.shift_id.as_str(),
                    record.verdict.as_str(),
                    record.evaluated_at.timestamp_millis(),
                    record.finalized,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn fetch_record(&self, shift_id: &ShiftId) -> anyhow::Result<Option<AttendanceRecord>> {
        let shift_id = shift_id.clone();
        self.with_conn(move |conn| {
            let record = conn
                .query_row(
                    "SELECT shift_id, verdict, evaluated_at, finalized
                     FROM attendance_records WHERE shift_id = ?1",
                    params![shift_id.as_str()],
                    |row| {
                        Ok(AttendanceRecord {
                            shift_id: ShiftId(row.get(0)?),
                            verdict: parse_column(row, 1)?,
                            evaluated_at: time_column(row, 2)?,
                            finalized: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(record)
        })
        .await
    }
}
