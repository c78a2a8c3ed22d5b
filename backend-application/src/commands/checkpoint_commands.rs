use tracing::info;

use crate::{AppError, AppState};
use backend_domain::qr_token;
use backend_domain::{Checkpoint, CheckpointDeletion, CheckpointDraft, CheckpointId, CheckpointView};

pub async fn register_checkpoint(
    state: &AppState,
    draft: CheckpointDraft,
) -> Result<CheckpointView, AppError> {
    let draft = draft.normalized()?;
    let now = state.clock.now();
    let checkpoint = Checkpoint {
        id: CheckpointId::generate(),
        name: draft.name,
        lat: draft.lat,
        lng: draft.lng,
        radius_meters: draft.radius_meters,
        qr_token: qr_token::issue_token(),
        token_rotated_at: now,
        created_at: now,
        updated_at: now,
    };
    state
        .checkpoint_repo
        .insert_checkpoint(&checkpoint)
        .await
        .map_err(AppError::Internal)?;
    info!("checkpoint {} '{}' registered", checkpoint.id, checkpoint.name);
    Ok(CheckpointView::from(checkpoint))
}

/// Edits name, coordinate and radius. The QR token is kept.
pub async fn update_checkpoint(
    state: &AppState,
    id: &CheckpointId,
    draft: CheckpointDraft,
) -> Result<CheckpointView, AppError> {
    let draft = draft.normalized()?;
    let mut checkpoint = load_checkpoint(state, id).await?;
    checkpoint.name = draft.name;
    checkpoint.lat = draft.lat;
    checkpoint.lng = draft.lng;
    checkpoint.radius_meters = draft.radius_meters;
    checkpoint.updated_at = state.clock.now();
    save_checkpoint(state, &checkpoint).await?;
    Ok(CheckpointView::from(checkpoint))
}

/// Issues a fresh token; the previous one stops validating immediately.
pub async fn rotate_token(state: &AppState, id: &CheckpointId) -> Result<CheckpointView, AppError> {
    let mut checkpoint = load_checkpoint(state, id).await?;
    let now = state.clock.now();
    checkpoint.qr_token = qr_token::issue_token();
    checkpoint.token_rotated_at = now;
    checkpoint.updated_at = now;
    save_checkpoint(state, &checkpoint).await?;
    info!("checkpoint {} token rotated", checkpoint.id);
    Ok(CheckpointView::from(checkpoint))
}

pub async fn delete_checkpoint(state: &AppState, id: &CheckpointId) -> Result<(), AppError> {
    let outcome = state
        .checkpoint_repo
        .delete_checkpoint(id, state.clock.now())
        .await
        .map_err(AppError::Internal)?;
    match outcome {
        CheckpointDeletion::Deleted => {
            info!("checkpoint {} deleted", id);
            Ok(())
        }
        CheckpointDeletion::NotFound => Err(AppError::NotFound(format!("checkpoint '{}'", id))),
        CheckpointDeletion::InUse { future_shifts } => Err(AppError::Conflict(format!(
            "checkpoint '{}' is referenced by {} upcoming shift(s)",
            id, future_shifts
        ))),
    }
}

async fn load_checkpoint(state: &AppState, id: &CheckpointId) -> Result<Checkpoint, AppError> {
    state
        .checkpoint_repo
        .fetch_checkpoint(id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("checkpoint '{}'", id)))
}

async fn save_checkpoint(state: &AppState, checkpoint: &Checkpoint) -> Result<(), AppError> {
    let updated = state
        .checkpoint_repo
        .update_checkpoint(checkpoint)
        .await
        .map_err(AppError::Internal)?;
    if !updated {
        return Err(AppError::NotFound(format!("checkpoint '{}'", checkpoint.id)));
    }
    Ok(())
}
