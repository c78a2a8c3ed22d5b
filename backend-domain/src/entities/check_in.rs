// Check-in entities
// Evidence submitted by a patroller at a checkpoint

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::value_objects::{Coordinate, ShiftId, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Arrival,
    Departure,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Arrival => "ARRIVAL",
            EventType::Departure => "DEPARTURE",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ARRIVAL" => Ok(EventType::Arrival),
            "DEPARTURE" => Ok(EventType::Departure),
            other => Err(ValidationError::new(format!("unknown event_type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    OutOfRange,
    InvalidToken,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::OutOfRange => "OUT_OF_RANGE",
            RejectionReason::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl FromStr for RejectionReason {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OUT_OF_RANGE" => Ok(RejectionReason::OutOfRange),
            "INVALID_TOKEN" => Ok(RejectionReason::InvalidToken),
            other => Err(ValidationError::new(format!(
                "unknown rejection reason '{}'",
                other
            ))),
        }
    }
}

/// Outcome of checking a submission against the geofence and the QR token.
/// A rejection is an expected result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceOutcome {
    Accepted,
    Rejected(RejectionReason),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInSubmission {
    pub shift_id: ShiftId,
    pub event_type: EventType,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub qr_token: String,
    pub client_timestamp: DateTime<Utc>,
}

/// Accepted evidence. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInEvent {
    pub id: String,
    pub shift_id: ShiftId,
    pub event_type: EventType,
    pub occurred_at: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
    pub coordinate: Coordinate,
    pub token_rotated_at: DateTime<Utc>,
}

impl CheckInEvent {
    pub fn accepted(
        submission: &CheckInSubmission,
        coordinate: Coordinate,
        token_rotated_at: DateTime<Utc>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shift_id: submission.shift_id.clone(),
            event_type: submission.event_type,
            occurred_at: submission.client_timestamp,
            received_at,
            coordinate,
            token_rotated_at,
        }
    }
}

/// Audit trail for discarded submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedCheckIn {
    pub id: String,
    pub shift_id: ShiftId,
    pub event_type: EventType,
    pub occurred_at: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
    pub coordinate: Option<Coordinate>,
    pub reason: RejectionReason,
}

impl RejectedCheckIn {
    pub fn from_submission(
        submission: &CheckInSubmission,
        reason: RejectionReason,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shift_id: submission.shift_id.clone(),
            event_type: submission.event_type,
            occurred_at: submission.client_timestamp,
            received_at,
            coordinate: submission.coordinate,
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInReceipt {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl CheckInReceipt {
    pub fn accepted(verdict: Option<Verdict>) -> Self {
        Self {
            accepted: true,
            reason: None,
            verdict,
        }
    }

    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
            verdict: None,
        }
    }
}
