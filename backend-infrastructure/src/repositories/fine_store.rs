use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use backend_domain::ports::FineRepository;
use backend_domain::{
    Fine, FineId, FineStatus, FineSummary, FineView, MemberId, PaymentTransition,
    ShiftId,
};

use crate::repositories::sqlite_store::{optional_time_column, parse_column, time_column};
use crate::repositories::SqliteStore;

const FINE_COLUMNS: &str =
    "f.id, f.member_id, f.shift_id, f.violation_type, f.amount, f.status, f.generated_at, f.paid_at, f.paid_by";

fn fine_from_row(row: &Row<'_>) -> rusqlite::Result<Fine> {
    Ok(Fine {
        id: FineId(row.get(0)?),
        member_id: MemberId(row.get(1)?),
        shift_id: ShiftId(row.get(2)?),
        violation_type: parse_column(row, 3)?,
        amount: row.get(4)?,
        status: parse_column(row, 5)?,
        generated_at: time_column(row, 6)?,
        paid_at: optional_time_column(row, 7)?,
        paid_by: row.get(8)?,
    })
}

fn fine_view_from_row(row: &Row<'_>) -> rusqlite::Result<FineView> {
    let fine = fine_from_row(row)?;
    let shift_starts_at = time_column(row, 11)?;
    Ok(FineView {
        fine,
        member_name: row.get(9)?,
        member_photo_url: row.get(10)?,
        shift_date: shift_starts_at.date_naive(),
        shift_starts_at,
    })
}

fn select_fine(conn: &Connection, id: &str) -> rusqlite::Result<Option<Fine>> {
    let sql = format!("SELECT {} FROM fines f WHERE f.id = ?1", FINE_COLUMNS);
    conn.query_row(&sql, params![id], fine_from_row).optional()
}

fn select_fine_for_shift(conn: &Connection, shift_id: &str) -> rusqlite::Result<Option<Fine>> {
    let sql = format!("SELECT {} FROM fines f WHERE f.shift_id = ?1", FINE_COLUMNS);
    conn.query_row(&sql, params![shift_id], fine_from_row).optional()
}

#[async_trait]
impl FineRepository for SqliteStore {
    async fn insert_fine_if_absent(&self, fine: &Fine) -> anyhow::Result<(Fine, bool)> {
        let fine = fine.clone();
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO fines (id, member_id, shift_id, violation_type, amount, status, generated_at, paid_at, paid_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(shift_id) DO NOTHING",
                params![
                    fine.id.as_str(),
                    fine.member_id.as_str(),
                    fine.shift_id.as_str(),
                    fine.violation_type.as_str(),
                    fine.amount,
                    fine.status.as_str(),
                    fine.generated_at.timestamp_millis(),
                    fine.paid_at.map(|at| at.timestamp_millis()),
                    fine.paid_by,
                ],
            )?;
            let stored = select_fine_for_shift(conn, fine.shift_id.as_str())?
                .ok_or_else(|| anyhow::anyhow!("fine for shift '{}' vanished", fine.shift_id))?;
            Ok((stored, inserted == 1))
        })
        .await
    }

    async fn fetch_fine(&self, id: &FineId) -> anyhow::Result<Option<Fine>> {
        let id = id.clone();
        self.with_conn(move |conn| Ok(select_fine(conn, id.as_str())?))
            .await
    }

    async fn fetch_fine_for_shift(&self, shift_id: &ShiftId) -> anyhow::Result<Option<Fine>> {
        let shift_id = shift_id.clone();
        self.with_conn(move |conn| Ok(select_fine_for_shift(conn, shift_id.as_str())?))
            .await
    }

    async fn list_fines(&self, status: Option<FineStatus>) -> anyhow::Result<Vec<FineView>> {
        self.with_conn(move |conn| {
            let mut sql = format!(
                "SELECT {}, m.name, m.photo_url, s.starts_at
                 FROM fines f
                 JOIN shifts s ON s.id = f.shift_id
                 LEFT JOIN members m ON m.id = f.member_id",
                FINE_COLUMNS
            );
            if status.is_some() {
                sql.push_str(" WHERE f.status = ?1");
            }
            sql.push_str(" ORDER BY f.generated_at DESC, f.id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = match status {
                Some(status) => stmt
                    .query_map(params![status.as_str()], fine_view_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
                None => stmt
                    .query_map([], fine_view_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(rows)
        })
        .await
    }

    async fn fetch_summary(&self) -> anyhow::Result<FineSummary> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT status, COUNT(*), COALESCE(SUM(amount), 0) FROM fines GROUP BY status",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    parse_column::<FineStatus>(row, 0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?;
            let mut summary = FineSummary::default();
            for row in rows {
                let (status, count, amount) = row?;
                match status {
                    FineStatus::Unpaid => {
                        summary.unpaid_count = count as u64;
                        summary.unpaid_amount = amount;
                    }
                    FineStatus::Paid => {
                        summary.paid_count = count as u64;
                        summary.paid_amount = amount;
                    }
                }
            }
            summary.total_count = summary.unpaid_count + summary.paid_count;
            Ok(summary)
        })
        .await
    }

    async fn mark_paid(
        &self,
        id: &FineId,
        paid_at: DateTime<Utc>,
        paid_by: &str,
    ) -> anyhow::Result<PaymentTransition> {
        let id = id.clone();
        let paid_by = paid_by.to_string();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE fines SET status = 'PAID', paid_at = ?2, paid_by = ?3
                 WHERE id = ?1 AND status = 'UNPAID'",
                params![id.as_str(), paid_at.timestamp_millis(), paid_by],
            )?;
            let current = select_fine(conn, id.as_str())?;
            Ok(match (changed, current) {
                (_, None) => PaymentTransition::NotFound,
                (1, Some(fine)) => PaymentTransition::Paid(fine),
                (_, Some(fine)) => PaymentTransition::AlreadyPaid(fine),
            })
        })
        .await
    }

    async fn revert_payment(&self, id: &FineId, paid_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE fines SET status = 'UNPAID', paid_at = NULL, paid_by = NULL
                 WHERE id = ?1 AND status = 'PAID' AND paid_at = ?2",
                params![id.as_str(), paid_at.timestamp_millis()],
            )?;
            Ok(changed == 1)
        })
        .await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.ping_store().await
    }
}
