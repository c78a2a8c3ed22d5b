use std::time::Duration;

use tracing::{error, info};

use backend_application::commands::evaluation_commands;
use backend_application::AppState;

/// Periodic sweep that finalizes ended shifts nobody has evaluated since
/// they ended. A running shift is never classified ABSENT.
pub async fn schedule_evaluations(state: AppState) {
    let interval_secs = state.config.evaluation_interval_seconds.max(1);
    info!("evaluation sweep every {}s", interval_secs);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(err) = evaluation_commands::evaluate_ended_shifts(&state).await {
            error!("evaluation sweep failed: {}", err);
        }
    }
}
