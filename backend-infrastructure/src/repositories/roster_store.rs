use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use backend_domain::ports::ShiftRepository;
use backend_domain::{CheckpointId, Member, MemberId, Shift, ShiftId};

use crate::repositories::sqlite_store::time_column;
use crate::repositories::SqliteStore;

const SHIFT_COLUMNS: &str = "s.id, s.member_id, s.checkpoint_id, s.starts_at, s.ends_at";

fn shift_from_row(row: &Row<'_>) -> rusqlite::Result<Shift> {
    Ok(Shift {
        id: ShiftId(row.get(0)?),
        member_id: MemberId(row.get(1)?),
        checkpoint_id: CheckpointId(row.get(2)?),
        starts_at: time_column(row, 3)?,
        ends_at: time_column(row, 4)?,
    })
}

fn day_bounds(date: NaiveDate) -> (i64, i64) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1);
    (start.timestamp_millis(), end.timestamp_millis())
}

#[async_trait]
impl ShiftRepository for SqliteStore {
    async fn upsert_roster(&self, members: &[Member], shifts: &[Shift]) -> anyhow::Result<()> {
        let members = members.to_vec();
        let shifts = shifts.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut member_stmt = tx.prepare(
                    "INSERT INTO members (id, name, photo_url) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET name = excluded.name, photo_url = excluded.photo_url",
                )?;
                for member in &members {
                    member_stmt.execute(params![
                        member.id.as_str(),
                        member.name,
                        member.photo_url
                    ])?;
                }
                let mut shift_stmt = tx.prepare(
                    "INSERT INTO shifts (id, member_id, checkpoint_id, starts_at, ends_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        member_id = excluded.member_id,
                        checkpoint_id = excluded.checkpoint_id,
                        starts_at = excluded.starts_at,
                        ends_at = excluded.ends_at",
                )?;
                for shift in &shifts {
                    shift_stmt.execute(params![
                        shift.id.as_str(),
                        shift.member_id.as_str(),
                        shift.checkpoint_id.as_str(),
                        shift.starts_at.timestamp_millis(),
                        shift.ends_at.timestamp_millis(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn fetch_shift(&self, id: &ShiftId) -> anyhow::Result<Option<Shift>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let sql = format!("SELECT {} FROM shifts s WHERE s.id = ?1", SHIFT_COLUMNS);
            let shift = conn
                .query_row(&sql, params![id.as_str()], shift_from_row)
                .optional()?;
            Ok(shift)
        })
        .await
    }

    async fn list_shifts(
        &self,
        date: Option<NaiveDate>,
        member_id: Option<&str>,
    ) -> anyhow::Result<Vec<Shift>> {
        let member_id = member_id.map(str::to_string);
        self.with_conn(move |conn| {
            let mut sql = format!("SELECT {} FROM shifts s WHERE 1 = 1", SHIFT_COLUMNS);
            let mut values: Vec<Value> = Vec::new();
            if let Some(date) = date {
                let (start, end) = day_bounds(date);
                sql.push_str(" AND s.starts_at >= ? AND s.starts_at < ?");
                values.push(Value::Integer(start));
                values.push(Value::Integer(end));
            }
            if let Some(member_id) = member_id {
                sql.push_str(" AND s.member_id = ?");
                values.push(Value::Text(member_id));
            }
            sql.push_str(" ORDER BY s.starts_at, s.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), shift_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn find_overlapping(
        &self,
        member_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        except: &ShiftId,
    ) -> anyhow::Result<Vec<Shift>> {
        let member_id = member_id.to_string();
        let except = except.clone();
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {} FROM shifts s
                 WHERE s.member_id = ?1 AND s.id <> ?2 AND s.starts_at < ?4 AND ?3 < s.ends_at
                 ORDER BY s.starts_at",
                SHIFT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![
                    member_id,
                    except.as_str(),
                    starts_at.timestamp_millis(),
                    ends_at.timestamp_millis()
                ],
                shift_from_row,
            )?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn list_unfinalized_ended(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<Shift>> {
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {} FROM shifts s
                 LEFT JOIN attendance_records a ON a.shift_id = s.id
                 WHERE s.ends_at <= ?1 AND (a.shift_id IS NULL OR a.finalized = 0)
                 ORDER BY s.ends_at, s.id
                 LIMIT ?2",
                SHIFT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![now.timestamp_millis(), limit as i64],
                shift_from_row,
            )?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }
}
