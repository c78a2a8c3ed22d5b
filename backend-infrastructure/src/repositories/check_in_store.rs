use async_trait::async_trait;
use rusqlite::{params, Row};

use backend_domain::ports::CheckInRepository;
use backend_domain::{CheckInEvent, Coordinate, RejectedCheckIn, ShiftId};

use crate::repositories::sqlite_store::{parse_column, time_column};
use crate::repositories::SqliteStore;

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<CheckInEvent> {
    Ok(CheckInEvent {
        id: row.get(0)?,
        shift_id: ShiftId(row.get(1)?),
        event_type: parse_column(row, 2)?,
        occurred_at: time_column(row, 3)?,
        received_at: time_column(row, 4)?,
        coordinate: Coordinate {
            lat: row.get(5)?,
            lng: row.get(6)?,
        },
        token_rotated_at: time_column(row, 7)?,
    })
}

fn rejected_from_row(row: &Row<'_>) -> rusqlite::Result<RejectedCheckIn> {
    let lat: Option<f64> = row.get(5)?;
    let lng: Option<f64> = row.get(6)?;
    Ok(RejectedCheckIn {
        id: row.get(0)?,
        shift_id: ShiftId(row.get(1)?),
        event_type: parse_column(row, 2)?,
        occurred_at: time_column(row, 3)?,
        received_at: time_column(row, 4)?,
        coordinate: lat.zip(lng).map(|(lat, lng)| Coordinate { lat, lng }),
        reason: parse_column(row, 7)?,
    })
}

#[async_trait]
impl CheckInRepository for SqliteStore {
    async fn insert_event(&self, event: &CheckInEvent) -> anyhow::Result<()> {
        let event = event.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO check_in_events (id, shift_id, event_type, occurred_at, received_at, lat, lng, token_rotated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    event.id,
                    event.shift_id.as_str(),
                    event.event_type.as_str(),
                    event.occurred_at.timestamp_millis(),
                    event.received_at.timestamp_millis(),
                    event.coordinate.lat,
                    event.coordinate.lng,
                    event.token_rotated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_rejected(&self, rejected: &RejectedCheckIn) -> anyhow::Result<()> {
        let rejected = rejected.clone();
        // Non-finite coordinates are stored as NULL.
        let coordinate = rejected
            .coordinate
            .filter(|c| c.lat.is_finite() && c.lng.is_finite());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO rejected_check_ins (id, shift_id, event_type, occurred_at, received_at, lat, lng, reason)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    rejected.id,
                    rejected.shift_id.as_str(),
                    rejected.event_type.as_str(),
                    rejected.occurred_at.timestamp_millis(),
                    rejected.received_at.timestamp_millis(),
                    coordinate.map(|c| c.lat),
                    coordinate.map(|c| c.lng),
                    rejected.reason.as_str(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_events(&self, shift_id: &ShiftId) -> anyhow::Result<Vec<CheckInEvent>> {
        let shift_id = shift_id.clone();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, shift_id, event_type, occurred_at, received_at, lat, lng, token_rotated_at
                 FROM check_in_events WHERE shift_id = ?1
                 ORDER BY occurred_at, received_at, id",
            )?;
            let rows = stmt.query_map(params![shift_id.as_str()], event_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn list_rejected(&self, shift_id: &ShiftId) -> anyhow::Result<Vec<RejectedCheckIn>> {
        let shift_id = shift_id.clone();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, shift_id, event_type, occurred_at, received_at, lat, lng, reason
                 FROM rejected_check_ins WHERE shift_id = ?1
                 ORDER BY received_at, id",
            )?;
            let rows = stmt.query_map(params![shift_id.as_str()], rejected_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }
}
