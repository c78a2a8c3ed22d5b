use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::commands::evaluation_commands::evaluate_locked;
use crate::{AppError, AppState};
use backend_domain::{
    assess_evidence, CheckInEvent, CheckInReceipt, CheckInSubmission, EventType, EvidenceOutcome,
    RejectedCheckIn, RuntimeConfig, Shift,
};

/// Records a patroller's scan. Evidence that fails the geofence or the token
/// check is audited and reported back, never counted.
pub async fn submit_check_in(
    state: &AppState,
    submission: CheckInSubmission,
) -> Result<CheckInReceipt, AppError> {
    let received_at = state.clock.now();
    validate_submission(&state.config, &submission, received_at)?;

    let shift = state
        .shift_repo
        .fetch_shift(&submission.shift_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("shift '{}'", submission.shift_id)))?;
    validate_window(&state.config, &shift, &submission)?;

    let checkpoint = state
        .checkpoint_repo
        .fetch_checkpoint(&shift.checkpoint_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("checkpoint '{}'", shift.checkpoint_id)))?;

    let outcome = assess_evidence(
        &checkpoint,
        submission.coordinate.as_ref(),
        &submission.qr_token,
    );
    let coordinate = match (outcome, submission.coordinate) {
        (EvidenceOutcome::Accepted, Some(coordinate)) => coordinate,
        (EvidenceOutcome::Rejected(reason), _) => {
            let rejected = RejectedCheckIn::from_submission(&submission, reason, received_at);
            state
                .check_in_repo
                .insert_rejected(&rejected)
                .await
                .map_err(AppError::Internal)?;
            state.metrics.record_check_in(false);
            warn!(
                "check-in {} for shift {} discarded: {}",
                submission.event_type,
                submission.shift_id,
                reason.as_str()
            );
            return Ok(CheckInReceipt::rejected(reason));
        }
        (EvidenceOutcome::Accepted, None) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "geofence accepted a check-in without coordinate"
            )));
        }
    };

    let _guard = state.shift_locks.acquire(&shift.id).await;
    let event = CheckInEvent::accepted(
        &submission,
        coordinate,
        checkpoint.token_rotated_at,
        received_at,
    );
    state
        .check_in_repo
        .insert_event(&event)
        .await
        .map_err(AppError::Internal)?;
    state.metrics.record_check_in(true);
    info!(
        "check-in {} accepted for shift {} at {}",
        event.event_type, event.shift_id, event.occurred_at
    );

    let evaluation = evaluate_locked(state, &shift, received_at).await?;
    Ok(CheckInReceipt::accepted(
        evaluation.map(|evaluation| evaluation.verdict),
    ))
}

fn validate_submission(
    config: &RuntimeConfig,
    submission: &CheckInSubmission,
    received_at: DateTime<Utc>,
) -> Result<(), AppError> {
    if submission.shift_id.as_str().trim().is_empty() {
        return Err(AppError::BadRequest("shift_id must not be empty".to_string()));
    }
    if submission.qr_token.trim().is_empty() {
        return Err(AppError::BadRequest("qr_token must not be empty".to_string()));
    }
    if let Some(coordinate) = &submission.coordinate {
        coordinate.validate()?;
    }
    let skew = (submission.client_timestamp - received_at).abs();
    if skew > config.max_clock_skew() {
        return Err(AppError::BadRequest(format!(
            "client_timestamp {} is more than {}s away from server time",
            submission.client_timestamp.to_rfc3339(),
            config.max_clock_skew_seconds
        )));
    }
    Ok(())
}

fn validate_window(
    config: &RuntimeConfig,
    shift: &Shift,
    submission: &CheckInSubmission,
) -> Result<(), AppError> {
    if submission.event_type != EventType::Arrival {
        return Ok(());
    }
    let Some(opens_at) = shift.starts_at.checked_sub_signed(config.early_arrival()) else {
        return Ok(());
    };
    if submission.client_timestamp < opens_at {
        return Err(AppError::BadRequest(format!(
            "check-in for shift '{}' opens at {}",
            shift.id,
            opens_at.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{CheckpointId, Coordinate, MemberId, ShiftId};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
    }

    fn submission(event_type: EventType, client_timestamp: DateTime<Utc>) -> CheckInSubmission {
        CheckInSubmission {
            shift_id: ShiftId::from("shift-1"),
            event_type,
            coordinate: Some(Coordinate {
                lat: -6.2,
                lng: 106.8,
            }),
            qr_token: "abc".to_string(),
            client_timestamp,
        }
    }

    fn shift() -> Shift {
        Shift {
            id: ShiftId::from("shift-1"),
            member_id: MemberId::from("m-1"),
            checkpoint_id: CheckpointId::from("cp-1"),
            starts_at: at(22, 0),
            ends_at: at(23, 0),
        }
    }

    #[test]
    fn rejects_excessive_clock_skew() {
        let config = RuntimeConfig::default();
        let ok = submission(EventType::Arrival, at(22, 4));
        assert!(validate_submission(&config, &ok, at(22, 0)).is_ok());
        let skewed = submission(EventType::Arrival, at(22, 6));
        let err = validate_submission(&config, &skewed, at(22, 0)).expect_err("skew");
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("client_timestamp")));
    }

    #[test]
    fn rejects_empty_token_and_bad_coordinate() {
        let config = RuntimeConfig::default();
        let mut empty = submission(EventType::Arrival, at(22, 0));
        empty.qr_token = "  ".to_string();
        assert!(validate_submission(&config, &empty, at(22, 0)).is_err());

        let mut bad = submission(EventType::Arrival, at(22, 0));
        bad.coordinate = Some(Coordinate { lat: 120.0, lng: 0.0 });
        assert!(validate_submission(&config, &bad, at(22, 0)).is_err());

        let mut missing = submission(EventType::Arrival, at(22, 0));
        missing.coordinate = None;
        assert!(validate_submission(&config, &missing, at(22, 0)).is_ok());
    }

    #[test]
    fn arrival_window_opens_before_start() {
        let config = RuntimeConfig::default();
        assert!(validate_window(&config, &shift(), &submission(EventType::Arrival, at(21, 0))).is_ok());
        assert!(validate_window(&config, &shift(), &submission(EventType::Arrival, at(20, 59))).is_err());
        assert!(validate_window(&config, &shift(), &submission(EventType::Departure, at(20, 0))).is_ok());
    }
}
