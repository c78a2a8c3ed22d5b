use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use backend_application::commands::check_in_commands;
use backend_application::AppState;
use backend_domain::{CheckInReceipt, CheckInSubmission};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_json};

/// A discarded scan still answers 200; the receipt carries the reason.
pub async fn submit_check_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<CheckInReceipt>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let submission: CheckInSubmission = parse_json(&body).map_err(|err| {
        error!("failed to parse check-in body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let receipt = check_in_commands::submit_check_in(&state, submission).await?;
    Ok(Json(receipt))
}
