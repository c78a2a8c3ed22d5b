use crate::{AppError, AppState};
use backend_domain::{CheckpointId, CheckpointView};

pub async fn list_checkpoints(state: &AppState) -> Result<Vec<CheckpointView>, AppError> {
    let checkpoints = state
        .checkpoint_repo
        .list_checkpoints()
        .await
        .map_err(AppError::Internal)?;
    Ok(checkpoints.into_iter().map(CheckpointView::from).collect())
}

pub async fn get_checkpoint(state: &AppState, id: &CheckpointId) -> Result<CheckpointView, AppError> {
    state
        .checkpoint_repo
        .fetch_checkpoint(id)
        .await
        .map_err(AppError::Internal)?
        .map(CheckpointView::from)
        .ok_or_else(|| AppError::NotFound(format!("checkpoint '{}'", id)))
}
