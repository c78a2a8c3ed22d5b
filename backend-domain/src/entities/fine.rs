// Fine entity
// Monetary consequence of a classified shift, with its payment lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::{FineId, MemberId, ShiftId, ViolationType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineStatus {
    Unpaid,
    Paid,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineStatus::Unpaid => "UNPAID",
            FineStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for FineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FineStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNPAID" => Ok(FineStatus::Unpaid),
            "PAID" => Ok(FineStatus::Paid),
            other => Err(ValidationError::new(format!("unknown fine status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fine {
    pub id: FineId,
    pub member_id: MemberId,
    pub shift_id: ShiftId,
    pub violation_type: ViolationType,
    pub amount: i64,
    pub status: FineStatus,
    pub generated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub paid_by: Option<String>,
}

impl Fine {
    pub fn is_paid(&self) -> bool {
        self.status == FineStatus::Paid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl FineFilter {
    pub fn status(&self) -> Option<FineStatus> {
        match self {
            FineFilter::All => None,
            FineFilter::Paid => Some(FineStatus::Paid),
            FineFilter::Unpaid => Some(FineStatus::Unpaid),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FineQuery {
    pub status: Option<FineFilter>,
}

/// Listing row with the member and shift fields the fine screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineView {
    #[serde(flatten)]
    pub fine: Fine,
    pub member_name: Option<String>,
    pub member_photo_url: Option<String>,
    pub shift_date: NaiveDate,
    pub shift_starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FineSummary {
    pub total_count: u64,
    pub unpaid_count: u64,
    pub unpaid_amount: i64,
    pub paid_count: u64,
    pub paid_amount: i64,
}

/// Result of the UNPAID -> PAID compare-and-set.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentTransition {
    Paid(Fine),
    AlreadyPaid(Fine),
    NotFound,
}

/// Emission to the RT wallet when a fine is reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerCredit {
    pub fine_id: FineId,
    pub member_id: MemberId,
    pub violation_type: ViolationType,
    pub amount: i64,
    pub credited_at: DateTime<Utc>,
    pub acting_admin: String,
}

impl LedgerCredit {
    pub fn for_fine(fine: &Fine, acting_admin: &str, credited_at: DateTime<Utc>) -> Self {
        Self {
            fine_id: fine.id.clone(),
            member_id: fine.member_id.clone(),
            violation_type: fine.violation_type,
            amount: fine.amount,
            credited_at,
            acting_admin: acting_admin.to_string(),
        }
    }
}
