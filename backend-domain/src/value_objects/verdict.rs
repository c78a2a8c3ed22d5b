// Attendance verdict value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::ViolationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    OnTime,
    Late,
    Absent,
    LeftEarly,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::OnTime => "ON_TIME",
            Verdict::Late => "LATE",
            Verdict::Absent => "ABSENT",
            Verdict::LeftEarly => "LEFT_EARLY",
        }
    }

    pub fn violation(&self) -> Option<ViolationType> {
        match self {
            Verdict::OnTime => None,
            Verdict::Late => Some(ViolationType::Late),
            Verdict::Absent => Some(ViolationType::Absent),
            Verdict::LeftEarly => Some(ViolationType::LeftEarly),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON_TIME" => Ok(Verdict::OnTime),
            "LATE" => Ok(Verdict::Late),
            "ABSENT" => Ok(Verdict::Absent),
            "LEFT_EARLY" => Ok(Verdict::LeftEarly),
            other => Err(ValidationError::new(format!("unknown verdict '{}'", other))),
        }
    }
}
