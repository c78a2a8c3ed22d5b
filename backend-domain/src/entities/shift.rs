// Shift entity
// Roster entries are owned by the scheduling domain and only read here

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, ValidationError};
use crate::value_objects::{CheckpointId, MemberId, ShiftId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub member_id: MemberId,
    pub checkpoint_id: CheckpointId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Shift {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::new("shift_id must not be empty"));
        }
        if self.member_id.as_str().trim().is_empty() {
            return Err(ValidationError::new(format!(
                "member id must not be empty for shift '{}'",
                self.id
            )));
        }
        if self.starts_at >= self.ends_at {
            return Err(ValidationError::new(format!(
                "shift '{}' must start before it ends",
                self.id
            )));
        }
        Ok(())
    }

    /// Half-open windows: back-to-back shifts do not overlap.
    pub fn overlaps(&self, other: &Shift) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }

    pub fn date(&self) -> NaiveDate {
        self.starts_at.date_naive()
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// One roster line as delivered by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub shift_id: ShiftId,
    pub member: Member,
    pub checkpoint_id: CheckpointId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl RosterEntry {
    pub fn to_shift(&self) -> Shift {
        Shift {
            id: ShiftId(self.shift_id.as_str().trim().to_string()),
            member_id: MemberId(self.member.id.as_str().trim().to_string()),
            checkpoint_id: CheckpointId(self.checkpoint_id.as_str().trim().to_string()),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftQuery {
    pub date: Option<String>,
    pub member_id: Option<String>,
}

/// Rejects any pair of shifts in `batch` that overlap for the same member.
pub fn ensure_no_overlap(batch: &[Shift]) -> Result<(), RosterError> {
    let mut sorted: Vec<&Shift> = batch.iter().collect();
    sorted.sort_by(|a, b| {
        a.member_id
            .as_str()
            .cmp(b.member_id.as_str())
            .then(a.starts_at.cmp(&b.starts_at))
    });
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.member_id == b.member_id && a.overlaps(b) {
            return Err(RosterError::Overlap {
                member_id: a.member_id.to_string(),
                shift_id: b.id.to_string(),
                other_shift_id: a.id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn shift(id: &str, member: &str, start_h: u32, end_h: u32) -> Shift {
        Shift {
            id: ShiftId::from(id),
            member_id: MemberId::from(member),
            checkpoint_id: CheckpointId::from("cp-1"),
            starts_at: Utc.with_ymd_and_hms(2025, 3, 1, start_h, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 3, 1, end_h, 0, 0).unwrap(),
        }
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(shift("s1", "m1", 22, 21).validate().is_err());
        assert!(shift("s1", "m1", 22, 22).validate().is_err());
        assert!(shift("s1", "m1", 21, 22).validate().is_ok());
    }

    #[test]
    fn back_to_back_shifts_do_not_overlap() {
        let batch = vec![shift("s1", "m1", 20, 21), shift("s2", "m1", 21, 22)];
        assert!(ensure_no_overlap(&batch).is_ok());
    }

    #[test]
    fn overlapping_shifts_for_same_member_are_rejected() {
        let batch = vec![
            shift("s1", "m1", 20, 22),
            shift("s2", "m2", 20, 22),
            shift("s3", "m1", 21, 23),
        ];
        match ensure_no_overlap(&batch) {
            Err(RosterError::Overlap { member_id, .. }) => assert_eq!(member_id, "m1"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
