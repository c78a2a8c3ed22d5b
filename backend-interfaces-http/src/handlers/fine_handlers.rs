use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::fine_commands;
use backend_application::queries::fine_queries;
use backend_application::AppState;
use backend_domain::{Fine, FineId, FineQuery, FineSummary, FineView};

use crate::error::HttpError;
use crate::middleware::{acting_admin, authorize};

pub async fn list_fines(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FineQuery>,
) -> Result<Json<Vec<FineView>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let rows = fine_queries::list_fines(&state, query).await?;
    Ok(Json(rows))
}

pub async fn fine_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FineSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = fine_queries::fine_summary(&state).await?;
    Ok(Json(summary))
}

pub async fn get_fine(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Fine>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let fine = fine_queries::get_fine(&state, &FineId(id)).await?;
    Ok(Json(fine))
}

pub async fn pay_fine(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Fine>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let fine = fine_commands::mark_paid(&state, &FineId(id), acting_admin(&headers)).await?;
    Ok(Json(fine))
}
