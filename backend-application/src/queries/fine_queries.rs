use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{Fine, FineId, FineQuery, FineSummary, FineView};

pub async fn list_fines(state: &AppState, query: FineQuery) -> Result<Vec<FineView>, AppError> {
    let filter = query.status.unwrap_or_default();
    let rows = state
        .fine_repo
        .list_fines(filter.status())
        .await
        .map_err(|err| {
            error!("failed to fetch fines: {}", err);
            AppError::Internal(err)
        })?;
    Ok(rows)
}

pub async fn get_fine(state: &AppState, id: &FineId) -> Result<Fine, AppError> {
    state
        .fine_repo
        .fetch_fine(id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("fine '{}'", id)))
}

pub async fn fine_summary(state: &AppState) -> Result<FineSummary, AppError> {
    state.fine_repo.fetch_summary().await.map_err(|err| {
        error!("failed to fetch fine summary: {}", err);
        AppError::Internal(err)
    })
}
