use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::{AppError, AppState};
use backend_domain::{
    authoritative_evidence, classify, generate_fine, verdict_is_settled, AttendanceRecord,
    EvaluationReport, FineDecision, Shift, ShiftId, Verdict,
};

const SWEEP_BATCH: usize = 500;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ShiftEvaluation {
    pub verdict: Verdict,
    pub fine_generated: bool,
}

/// Classifies `shift` and generates its fine. The caller must hold the shift
/// lock. Returns None while the shift is running and has no accepted arrival.
/// A fine is only generated from a settled verdict; until then the attendance
/// record carries the provisional one.
pub(crate) async fn evaluate_locked(
    state: &AppState,
    shift: &Shift,
    now: DateTime<Utc>,
) -> Result<Option<ShiftEvaluation>, AppError> {
    let events = state
        .check_in_repo
        .list_events(&shift.id)
        .await
        .map_err(AppError::Internal)?;
    let evidence = authoritative_evidence(shift, &events);
    let finalized = shift.has_ended(now);
    if evidence.arrival.is_none() && !finalized {
        return Ok(None);
    }

    let settings = { state.fine_settings.read().await.clone() };
    let verdict = classify(shift, evidence.arrival, evidence.departure, &settings);
    state
        .attendance_repo
        .save_record(&AttendanceRecord {
            shift_id: shift.id.clone(),
            verdict,
            evaluated_at: now,
            finalized,
        })
        .await
        .map_err(AppError::Internal)?;

    if !finalized && !verdict_is_settled(verdict, &evidence, now, state.config.max_clock_skew()) {
        return Ok(Some(ShiftEvaluation {
            verdict,
            fine_generated: false,
        }));
    }

    let existing = state
        .fine_repo
        .fetch_fine_for_shift(&shift.id)
        .await
        .map_err(AppError::Internal)?;
    let mut fine_generated = false;
    match generate_fine(shift, verdict, &settings, existing.as_ref(), now) {
        FineDecision::Create(fine) => {
            let (stored, created) = state
                .fine_repo
                .insert_fine_if_absent(&fine)
                .await
                .map_err(AppError::Internal)?;
            if created {
                fine_generated = true;
                state.metrics.record_fine_generated();
                info!(
                    "fine {} generated for shift {}: {} {}",
                    stored.id, shift.id, stored.violation_type, stored.amount
                );
            }
        }
        FineDecision::Inactive(violation) => {
            info!(
                "shift {} classified {} but the {} fine is inactive",
                shift.id, verdict, violation
            );
        }
        FineDecision::Existing(_) | FineDecision::NoViolation => {}
    }

    Ok(Some(ShiftEvaluation {
        verdict,
        fine_generated,
    }))
}

pub async fn evaluate_shift(state: &AppState, shift_id: &ShiftId) -> Result<Option<Verdict>, AppError> {
    let _guard = state.shift_locks.acquire(shift_id).await;
    let shift = state
        .shift_repo
        .fetch_shift(shift_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("shift '{}'", shift_id)))?;
    let evaluation = evaluate_locked(state, &shift, state.clock.now()).await?;
    Ok(evaluation.map(|evaluation| evaluation.verdict))
}

/// Finalizes every ended shift that has not been finalized yet. One failing
/// shift does not stop the sweep.
pub async fn evaluate_ended_shifts(state: &AppState) -> Result<EvaluationReport, AppError> {
    let now = state.clock.now();
    let shifts = state
        .shift_repo
        .list_unfinalized_ended(now, SWEEP_BATCH)
        .await
        .map_err(AppError::Internal)?;

    let mut report = EvaluationReport::default();
    for shift in shifts {
        let _guard = state.shift_locks.acquire(&shift.id).await;
        match evaluate_locked(state, &shift, now).await {
            Ok(Some(evaluation)) => {
                report.evaluated += 1;
                if evaluation.fine_generated {
                    report.fines_generated += 1;
                }
            }
            Ok(None) => {}
            Err(err) => {
                error!("failed to evaluate shift {}: {}", shift.id, err);
                report.failed += 1;
            }
        }
    }
    if report.evaluated > 0 || report.failed > 0 {
        info!(
            "evaluated {} ended shifts ({} fines, {} failures)",
            report.evaluated, report.fines_generated, report.failed
        );
    }
    Ok(report)
}
