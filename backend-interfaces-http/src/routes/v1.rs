use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    check_in_handlers, checkpoint_handlers, fine_handlers, ops_handlers, setting_handlers,
    shift_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/ronda/check-ins",
            post(check_in_handlers::submit_check_in),
        )
        .route("/v1/ronda/fines", get(fine_handlers::list_fines))
        .route("/v1/ronda/fines/summary", get(fine_handlers::fine_summary))
        .route("/v1/ronda/fines/:id", get(fine_handlers::get_fine))
        .route("/v1/ronda/fines/:id/pay", post(fine_handlers::pay_fine))
        .route(
            "/v1/ronda/fine-settings",
            get(setting_handlers::list_fine_settings).put(setting_handlers::update_fine_settings),
        )
        .route(
            "/v1/ronda/checkpoints",
            get(checkpoint_handlers::list_checkpoints).post(checkpoint_handlers::create_checkpoint),
        )
        .route(
            "/v1/ronda/checkpoints/:id",
            get(checkpoint_handlers::get_checkpoint)
                .put(checkpoint_handlers::update_checkpoint)
                .delete(checkpoint_handlers::delete_checkpoint),
        )
        .route(
            "/v1/ronda/checkpoints/:id/rotate-token",
            post(checkpoint_handlers::rotate_checkpoint_token),
        )
        .route(
            "/v1/ronda/shifts",
            get(shift_handlers::list_shifts).put(shift_handlers::import_roster),
        )
        .route(
            "/v1/ronda/shifts/evaluate",
            post(shift_handlers::evaluate_shifts),
        )
        .route("/v1/ronda/shifts/:id", get(shift_handlers::get_shift))
        .route(
            "/v1/ronda/shifts/:id/attendance",
            get(shift_handlers::shift_attendance),
        )
        .route(
            "/v1/ops/ledger-target/check",
            get(ops_handlers::ledger_target_check),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
