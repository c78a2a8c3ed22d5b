use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

use crate::middleware::authorize;

#[derive(serde::Serialize)]
struct LedgerStatus {
    status: String,
    mode: String,
}

pub async fn ledger_target_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mode = if state.config.ledger_webhook_url.is_some() {
        "webhook"
    } else {
        "journal"
    };
    if !authorize(&state.config, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(LedgerStatus {
                status: "unauthorized".to_string(),
                mode: mode.to_string(),
            }),
        )
            .into_response();
    }

    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let (status_code, status) =
        match timeout(Duration::from_secs(timeout_secs), state.ledger.check_target()).await {
            Ok(Ok(_)) => (StatusCode::OK, "ok"),
            Ok(Err(err)) => {
                error!("ledger target check failed: {}", err);
                (StatusCode::SERVICE_UNAVAILABLE, "error")
            }
            Err(_) => {
                error!("ledger target check timeout after {}s", timeout_secs);
                (StatusCode::SERVICE_UNAVAILABLE, "timeout")
            }
        };
    (
        status_code,
        Json(LedgerStatus {
            status: status.to_string(),
            mode: mode.to_string(),
        }),
    )
        .into_response()
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.fine_repo.ping()).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
