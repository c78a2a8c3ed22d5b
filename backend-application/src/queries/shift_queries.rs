use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{authoritative_evidence, parse_date, Shift, ShiftAttendance, ShiftId, ShiftQuery};

pub async fn list_shifts(state: &AppState, query: ShiftQuery) -> Result<Vec<Shift>, AppError> {
    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            parse_date(raw).map_err(|err| AppError::BadRequest(format!("invalid date: {}", err)))?,
        ),
        None => None,
    };
    let member_id = query
        .member_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    state
        .shift_repo
        .list_shifts(date, member_id)
        .await
        .map_err(|err| {
            error!("failed to fetch shifts: {}", err);
            AppError::Internal(err)
        })
}

pub async fn get_shift(state: &AppState, id: &ShiftId) -> Result<Shift, AppError> {
    state
        .shift_repo
        .fetch_shift(id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("shift '{}'", id)))
}

/// Verdict, authoritative evidence, audit trail and fine of one shift.
pub async fn shift_attendance(state: &AppState, id: &ShiftId) -> Result<ShiftAttendance, AppError> {
    let shift = get_shift(state, id).await?;
    let record = state
        .attendance_repo
        .fetch_record(id)
        .await
        .map_err(AppError::Internal)?;
    let accepted_events = state
        .check_in_repo
        .list_events(id)
        .await
        .map_err(AppError::Internal)?;
    let rejected_events = state
        .check_in_repo
        .list_rejected(id)
        .await
        .map_err(AppError::Internal)?;
    let fine = state
        .fine_repo
        .fetch_fine_for_shift(id)
        .await
        .map_err(AppError::Internal)?;

    let evidence = authoritative_evidence(&shift, &accepted_events);
    let arrival = evidence.arrival.cloned();
    let departure = evidence.departure.cloned();
    Ok(ShiftAttendance {
        shift,
        record,
        arrival,
        departure,
        accepted_events,
        rejected_events,
        fine,
    })
}
