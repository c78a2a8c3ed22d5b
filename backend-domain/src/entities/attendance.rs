// Attendance record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{CheckInEvent, Fine, RejectedCheckIn, Shift};
use crate::value_objects::{ShiftId, Verdict};

/// Latest verdict for a shift. `finalized` flips once the shift has ended and
/// the sweep has evaluated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub shift_id: ShiftId,
    pub verdict: Verdict,
    pub evaluated_at: DateTime<Utc>,
    pub finalized: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftAttendance {
    pub shift: Shift,
    pub record: Option<AttendanceRecord>,
    pub arrival: Option<CheckInEvent>,
    pub departure: Option<CheckInEvent>,
    pub accepted_events: Vec<CheckInEvent>,
    pub rejected_events: Vec<RejectedCheckIn>,
    pub fine: Option<Fine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluated: usize,
    pub fines_generated: usize,
    pub failed: usize,
}
