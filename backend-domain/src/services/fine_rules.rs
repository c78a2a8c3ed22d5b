use chrono::{DateTime, Utc};

use crate::entities::{Fine, FineSettings, FineStatus, Shift};
use crate::value_objects::{FineId, Verdict, ViolationType};

#[derive(Debug, Clone, PartialEq)]
pub enum FineDecision {
    NoViolation,
    /// A violation occurred but its setting is missing or switched off.
    Inactive(ViolationType),
    /// The shift already carries a fine; it is left untouched.
    Existing(Fine),
    Create(Fine),
}

impl FineDecision {
    pub fn fine(&self) -> Option<&Fine> {
        match self {
            FineDecision::Existing(fine) | FineDecision::Create(fine) => Some(fine),
            FineDecision::NoViolation | FineDecision::Inactive(_) => None,
        }
    }
}

/// Maps a verdict to at most one fine per shift. The amount is copied from the
/// setting in force now and never recomputed.
pub fn generate_fine(
    shift: &Shift,
    verdict: Verdict,
    settings: &FineSettings,
    existing: Option<&Fine>,
    now: DateTime<Utc>,
) -> FineDecision {
    let Some(violation) = verdict.violation() else {
        return FineDecision::NoViolation;
    };
    if let Some(fine) = existing {
        return FineDecision::Existing(fine.clone());
    }
    let setting = match settings.get(violation) {
        Some(setting) if setting.is_active => setting,
        _ => return FineDecision::Inactive(violation),
    };
    FineDecision::Create(Fine {
        id: FineId::generate(),
        member_id: shift.member_id.clone(),
        shift_id: shift.id.clone(),
        violation_type: violation,
        amount: setting.amount,
        status: FineStatus::Unpaid,
        generated_at: now,
        paid_at: None,
        paid_by: None,
    })
}
