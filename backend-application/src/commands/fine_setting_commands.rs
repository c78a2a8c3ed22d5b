use std::collections::HashSet;

use tracing::info;

use crate::{AppError, AppState};
use backend_domain::{FineSetting, FineSettingApi, FineSettings};

/// Overwrites the setting of every type in the payload. Settings already
/// stamped on generated fines are not touched.
pub async fn upsert_fine_settings(
    state: &AppState,
    incoming: Vec<FineSettingApi>,
) -> Result<Vec<FineSetting>, AppError> {
    if incoming.is_empty() {
        return Err(AppError::BadRequest("settings must not be empty".to_string()));
    }
    let mut seen = HashSet::new();
    for setting in &incoming {
        setting.validate()?;
        if !seen.insert(setting.violation_type) {
            return Err(AppError::BadRequest(format!(
                "duplicate violation_type '{}'",
                setting.violation_type
            )));
        }
    }

    let now = state.clock.now();
    let settings = incoming
        .into_iter()
        .map(|setting| setting.into_setting(now))
        .collect::<Vec<_>>();
    state
        .setting_repo
        .save_settings(&settings)
        .await
        .map_err(AppError::Internal)?;

    let stored = state
        .setting_repo
        .load_settings()
        .await
        .map_err(AppError::Internal)?;
    let snapshot = FineSettings::new(stored);
    let list = snapshot.to_sorted_vec();
    *state.fine_settings.write().await = snapshot;
    info!("fine settings updated ({} types)", settings.len());
    Ok(list)
}
