use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use backend_application::commands::{evaluation_commands, roster_commands};
use backend_application::queries::shift_queries;
use backend_application::AppState;
use backend_domain::{EvaluationReport, RosterEntry, Shift, ShiftAttendance, ShiftId, ShiftQuery};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_json};

pub async fn list_shifts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ShiftQuery>,
) -> Result<Json<Vec<Shift>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let shifts = shift_queries::list_shifts(&state, query).await?;
    Ok(Json(shifts))
}

pub async fn import_roster(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<Vec<Shift>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entries: Vec<RosterEntry> = parse_json(&body).map_err(|err| {
        error!("failed to parse roster: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let shifts = roster_commands::import_roster(&state, entries).await?;
    Ok(Json(shifts))
}

pub async fn get_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Shift>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let shift = shift_queries::get_shift(&state, &ShiftId(id)).await?;
    Ok(Json(shift))
}

pub async fn shift_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ShiftAttendance>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let attendance = shift_queries::shift_attendance(&state, &ShiftId(id)).await?;
    Ok(Json(attendance))
}

pub async fn evaluate_shifts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EvaluationReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = evaluation_commands::evaluate_ended_shifts(&state).await?;
    Ok(Json(report))
}
