use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::{AppError, AppState};
use backend_domain::{ensure_no_overlap, normalize_optional_text, Member, RosterEntry, RosterError, Shift};

/// Upserts the roster delivered by the scheduler. The whole batch is rejected
/// if any entry is invalid or overlaps another shift of the same member.
pub async fn import_roster(
    state: &AppState,
    entries: Vec<RosterEntry>,
) -> Result<Vec<Shift>, AppError> {
    if entries.is_empty() {
        return Err(AppError::BadRequest("roster must not be empty".to_string()));
    }

    let mut members: HashMap<String, Member> = HashMap::new();
    let mut shifts = Vec::with_capacity(entries.len());
    let mut shift_ids = HashSet::new();
    for entry in &entries {
        let shift = entry.to_shift();
        shift.validate()?;
        if !shift_ids.insert(shift.id.clone()) {
            return Err(AppError::BadRequest(format!(
                "duplicate shift_id '{}'",
                shift.id
            )));
        }
        let name = entry.member.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(format!(
                "member name must not be empty for shift '{}'",
                shift.id
            )));
        }
        members.insert(
            shift.member_id.to_string(),
            Member {
                id: shift.member_id.clone(),
                name: name.to_string(),
                photo_url: normalize_optional_text(entry.member.photo_url.clone()),
            },
        );
        shifts.push(shift);
    }
    ensure_no_overlap(&shifts)?;

    let mut known_checkpoints = HashSet::new();
    for shift in &shifts {
        if known_checkpoints.contains(&shift.checkpoint_id) {
            continue;
        }
        let exists = state
            .checkpoint_repo
            .fetch_checkpoint(&shift.checkpoint_id)
            .await
            .map_err(AppError::Internal)?
            .is_some();
        if !exists {
            return Err(AppError::BadRequest(format!(
                "unknown checkpoint '{}' for shift '{}'",
                shift.checkpoint_id, shift.id
            )));
        }
        known_checkpoints.insert(shift.checkpoint_id.clone());
    }

    for shift in &shifts {
        let stored = state
            .shift_repo
            .find_overlapping(
                shift.member_id.as_str(),
                shift.starts_at,
                shift.ends_at,
                &shift.id,
            )
            .await
            .map_err(AppError::Internal)?;
        if let Some(other) = stored
            .into_iter()
            .find(|other| !shift_ids.contains(&other.id))
        {
            return Err(RosterError::Overlap {
                member_id: shift.member_id.to_string(),
                shift_id: shift.id.to_string(),
                other_shift_id: other.id.to_string(),
            }
            .into());
        }
    }

    let mut members = members.into_values().collect::<Vec<_>>();
    members.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    state
        .shift_repo
        .upsert_roster(&members, &shifts)
        .await
        .map_err(AppError::Internal)?;
    info!(
        "roster imported: {} shifts for {} members",
        shifts.len(),
        members.len()
    );
    Ok(shifts)
}
