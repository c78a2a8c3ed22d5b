use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use backend_application::commands::fine_setting_commands;
use backend_application::queries::fine_setting_queries;
use backend_application::AppState;
use backend_domain::{FineSetting, FineSettingApi};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_json};

pub async fn list_fine_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FineSetting>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(fine_setting_queries::list_fine_settings(&state).await))
}

pub async fn update_fine_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<Vec<FineSetting>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let settings: Vec<FineSettingApi> = parse_json(&body).map_err(|err| {
        error!("failed to parse fine settings: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let stored = fine_setting_commands::upsert_fine_settings(&state, settings).await?;
    Ok(Json(stored))
}
