use async_trait::async_trait;
use rusqlite::params;

use backend_domain::ports::FineSettingRepository;
use backend_domain::FineSetting;

use crate::repositories::sqlite_store::{parse_column, time_column};
use crate::repositories::SqliteStore;

#[async_trait]
impl FineSettingRepository for SqliteStore {
    async fn load_settings(&self) -> anyhow::Result<Vec<FineSetting>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT violation_type, amount, tolerance_minutes, is_active, updated_at
                 FROM fine_settings ORDER BY violation_type",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(FineSetting {
                    violation_type: parse_column(row, 0)?,
                    amount: row.get(1)?,
                    tolerance_minutes: row.get(2)?,
                    is_active: row.get(3)?,
                    updated_at: time_column(row, 4)?,
                })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn save_settings(&self, settings: &[FineSetting]) -> anyhow::Result<()> {
        let settings = settings.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO fine_settings (violation_type, amount, tolerance_minutes, is_active, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(violation_type) DO UPDATE SET
                        amount = excluded.amount,
                        tolerance_minutes = excluded.tolerance_minutes,
                        is_active = excluded.is_active,
                        updated_at = excluded.updated_at",
                )?;
                for setting in &settings {
                    stmt.execute(params![
                        setting.violation_type.as_str(),
                        setting.amount,
                        setting.tolerance_minutes,
                        setting.is_active,
                        setting.updated_at.timestamp_millis(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }
}
