// Fine setting entity
// Admin-configured amount and tolerance per violation type

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::ViolationType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineSetting {
    pub violation_type: ViolationType,
    pub amount: i64,
    pub tolerance_minutes: i64,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineSettingApi {
    pub violation_type: ViolationType,
    pub amount: i64,
    #[serde(default)]
    pub tolerance_minutes: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Tolerances longer than a day make no sense for a night shift.
pub const MAX_TOLERANCE_MINUTES: i64 = 24 * 60;

fn default_active() -> bool {
    true
}

impl FineSettingApi {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount < 0 {
            return Err(ValidationError::new(format!(
                "amount must be >= 0 for {}",
                self.violation_type
            )));
        }
        if self.tolerance_minutes < 0 {
            return Err(ValidationError::new(format!(
                "tolerance_minutes must be >= 0 for {}",
                self.violation_type
            )));
        }
        if self.tolerance_minutes > MAX_TOLERANCE_MINUTES {
            return Err(ValidationError::new(format!(
                "tolerance_minutes must be <= {} for {}",
                MAX_TOLERANCE_MINUTES, self.violation_type
            )));
        }
        Ok(())
    }

    pub fn into_setting(self, updated_at: DateTime<Utc>) -> FineSetting {
        // ABSENT ignores tolerance; store zero so the screen does not show a stale value.
        let tolerance_minutes = if self.violation_type.uses_tolerance() {
            self.tolerance_minutes
        } else {
            0
        };
        FineSetting {
            violation_type: self.violation_type,
            amount: self.amount,
            tolerance_minutes,
            is_active: self.is_active,
            updated_at,
        }
    }
}

/// Snapshot of the settings in force at classification time.
#[derive(Debug, Clone, Default)]
pub struct FineSettings {
    by_type: HashMap<ViolationType, FineSetting>,
}

impl FineSettings {
    pub fn new(settings: impl IntoIterator<Item = FineSetting>) -> Self {
        Self {
            by_type: settings
                .into_iter()
                .map(|setting| (setting.violation_type, setting))
                .collect(),
        }
    }

    pub fn get(&self, violation: ViolationType) -> Option<&FineSetting> {
        self.by_type.get(&violation)
    }

    /// Missing settings count as zero tolerance.
    pub fn tolerance_minutes(&self, violation: ViolationType) -> i64 {
        self.get(violation)
            .map(|setting| setting.tolerance_minutes.max(0))
            .unwrap_or(0)
    }

    /// Saturates instead of overflowing for rows written before the bound existed.
    pub fn tolerance(&self, violation: ViolationType) -> TimeDelta {
        TimeDelta::try_minutes(self.tolerance_minutes(violation)).unwrap_or(TimeDelta::MAX)
    }

    pub fn to_sorted_vec(&self) -> Vec<FineSetting> {
        let mut list: Vec<FineSetting> = self.by_type.values().cloned().collect();
        list.sort_by_key(|setting| setting.violation_type);
        list
    }
}
