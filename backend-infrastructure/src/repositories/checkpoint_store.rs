use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use backend_domain::ports::{CheckpointDeletion, CheckpointRepository};
use backend_domain::{Checkpoint, CheckpointId};

use crate::repositories::sqlite_store::time_column;
use crate::repositories::SqliteStore;

const CHECKPOINT_COLUMNS: &str =
    "id, name, lat, lng, radius_meters, qr_token, token_rotated_at, created_at, updated_at";

fn checkpoint_from_row(row: &Row<'_>) -> rusqlite::Result<Checkpoint> {
    Ok(Checkpoint {
        id: CheckpointId(row.get(0)?),
        name: row.get(1)?,
        lat: row.get(2)?,
        lng: row.get(3)?,
        radius_meters: row.get(4)?,
        qr_token: row.get(5)?,
        token_rotated_at: time_column(row, 6)?,
        created_at: time_column(row, 7)?,
        updated_at: time_column(row, 8)?,
    })
}

#[async_trait]
impl CheckpointRepository for SqliteStore {
    async fn insert_checkpoint(&self, checkpoint: &Checkpoint) -> anyhow::Result<()> {
        let checkpoint = checkpoint.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO checkpoints (id, name, lat, lng, radius_meters, qr_token, token_rotated_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    checkpoint.id.as_str(),
                    checkpoint.name,
                    checkpoint.lat,
                    checkpoint.lng,
                    checkpoint.radius_meters,
                    checkpoint.qr_token,
                    checkpoint.token_rotated_at.timestamp_millis(),
                    checkpoint.created_at.timestamp_millis(),
                    checkpoint.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn update_checkpoint(&self, checkpoint: &Checkpoint) -> anyhow::Result<bool> {
        let checkpoint = checkpoint.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE checkpoints
                 SET name = ?2, lat = ?3, lng = ?4, radius_meters = ?5,
                     qr_token = ?6, token_rotated_at = ?7, updated_at = ?8
                 WHERE id = ?1",
                params![
                    checkpoint.id.as_str(),
                    checkpoint.name,
                    checkpoint.lat,
                    checkpoint.lng,
                    checkpoint.radius_meters,
                    checkpoint.qr_token,
                    checkpoint.token_rotated_at.timestamp_millis(),
                    checkpoint.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(changed == 1)
        })
        .await
    }

    async fn fetch_checkpoint(&self, id: &CheckpointId) -> anyhow::Result<Option<Checkpoint>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let sql = format!("SELECT {} FROM checkpoints WHERE id = ?1", CHECKPOINT_COLUMNS);
            let checkpoint = conn
                .query_row(&sql, params![id.as_str()], checkpoint_from_row)
                .optional()?;
            Ok(checkpoint)
        })
        .await
    }

    async fn list_checkpoints(&self) -> anyhow::Result<Vec<Checkpoint>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM checkpoints ORDER BY name, id", CHECKPOINT_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], checkpoint_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn delete_checkpoint(
        &self,
        id: &CheckpointId,
        now: DateTime<Utc>,
    ) -> anyhow::Result<CheckpointDeletion> {
        let id = id.clone();
        let now_ms = now.timestamp_millis();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let exists = tx
                .query_row(
                    "SELECT 1 FROM checkpoints WHERE id = ?1",
                    params![id.as_str()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Ok(CheckpointDeletion::NotFound);
            }
            let future_shifts: i64 = tx.query_row(
                "SELECT COUNT(*) FROM shifts WHERE checkpoint_id = ?1 AND ends_at > ?2",
                params![id.as_str(), now_ms],
                |row| row.get(0),
            )?;
            if future_shifts > 0 {
                return Ok(CheckpointDeletion::InUse {
                    future_shifts: future_shifts as u64,
                });
            }
            tx.execute("DELETE FROM checkpoints WHERE id = ?1", params![id.as_str()])?;
            tx.commit()?;
            Ok(CheckpointDeletion::Deleted)
        })
        .await
    }
}
