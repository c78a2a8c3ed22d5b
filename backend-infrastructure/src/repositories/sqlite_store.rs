use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use tokio::task;
use tracing::info;

use backend_domain::{millis_to_utc, LedgerCredit};
#[cfg(test)]
use backend_domain::{FineId, MemberId};

use crate::repositories::schema::SCHEMA;

/// Single shared SQLite connection. Every call runs on the blocking pool and
/// holds the connection for the whole closure, so multi-statement closures are
/// serialized with respect to each other.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let conn = Connection::open(&path)
                .with_context(|| format!("open sqlite database {}", path.display()))?;
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
            info!("sqlite store opened at {}", path.display());
            Ok::<_, anyhow::Error>(conn)
        })
        .await??;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store
            .with_conn(|conn| {
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await?;
        Ok(store)
    }

    pub(crate) async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| anyhow!("sqlite connection lock poisoned"))?;
            f(&mut guard)
        })
        .await?
    }

    /// Journals a credit once per fine; repeats are ignored.
    pub async fn record_credit(&self, credit: &LedgerCredit) -> Result<bool> {
        let credit = credit.clone();
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO ledger_credits (fine_id, member_id, violation_type, amount, credited_at, acting_admin)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(fine_id) DO NOTHING",
                params![
                    credit.fine_id.as_str(),
                    credit.member_id.as_str(),
                    credit.violation_type.as_str(),
                    credit.amount,
                    credit.credited_at.timestamp_millis(),
                    credit.acting_admin,
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
    }

    #[cfg(test)]
    pub(crate) async fn list_credits(&self) -> Result<Vec<LedgerCredit>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT fine_id, member_id, violation_type, amount, credited_at, acting_admin
                 FROM ledger_credits ORDER BY credited_at, fine_id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(LedgerCredit {
                    fine_id: FineId(row.get(0)?),
                    member_id: MemberId(row.get(1)?),
                    violation_type: parse_column(row, 2)?,
                    amount: row.get(3)?,
                    credited_at: time_column(row, 4)?,
                    acting_admin: row.get(5)?,
                })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    pub async fn ping_store(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
    }
}

/// Reads a text column and parses it into a domain enum.
pub(crate) fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

#[derive(Debug, thiserror::Error)]
#[error("stored timestamp {0} ms is out of range")]
pub(crate) struct TimestampOutOfRange(pub i64);

/// Reads an epoch-millis column.
pub(crate) fn time_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(idx)?;
    millis_to_utc(ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(TimestampOutOfRange(ms)))
    })
}

pub(crate) fn optional_time_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(idx)? {
        Some(_) => time_column(row, idx).map(Some),
        None => Ok(None),
    }
}
