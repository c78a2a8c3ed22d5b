use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::checkpoint_commands;
use backend_application::queries::checkpoint_queries;
use backend_application::AppState;
use backend_domain::{CheckpointDraft, CheckpointId, CheckpointView};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_json};

pub async fn list_checkpoints(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CheckpointView>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let list = checkpoint_queries::list_checkpoints(&state).await?;
    Ok(Json(list))
}

pub async fn create_checkpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<CheckpointView>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let draft: CheckpointDraft =
        parse_json(&body).map_err(|err| HttpError::BadRequest(err.to_string()))?;
    let view = checkpoint_commands::register_checkpoint(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_checkpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CheckpointView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = checkpoint_queries::get_checkpoint(&state, &CheckpointId(id)).await?;
    Ok(Json(view))
}

pub async fn update_checkpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: axum::body::Bytes,
) -> Result<Json<CheckpointView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let draft: CheckpointDraft =
        parse_json(&body).map_err(|err| HttpError::BadRequest(err.to_string()))?;
    let view = checkpoint_commands::update_checkpoint(&state, &CheckpointId(id), draft).await?;
    Ok(Json(view))
}

pub async fn delete_checkpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    checkpoint_commands::delete_checkpoint(&state, &CheckpointId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rotate_checkpoint_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CheckpointView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = checkpoint_commands::rotate_token(&state, &CheckpointId(id)).await?;
    Ok(Json(view))
}
