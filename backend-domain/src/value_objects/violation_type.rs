// Violation type value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Closed set of fineable violations. The Indonesian aliases are the names the
/// mobile screens use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    #[serde(alias = "TIDAK_HADIR")]
    Absent,
    #[serde(alias = "TELAT")]
    Late,
    #[serde(alias = "PULANG_CEPAT")]
    LeftEarly,
}

impl ViolationType {
    pub const ALL: [ViolationType; 3] = [
        ViolationType::Absent,
        ViolationType::Late,
        ViolationType::LeftEarly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::Absent => "ABSENT",
            ViolationType::Late => "LATE",
            ViolationType::LeftEarly => "LEFT_EARLY",
        }
    }

    /// Tolerance does not apply to ABSENT.
    pub fn uses_tolerance(&self) -> bool {
        match self {
            ViolationType::Absent => false,
            ViolationType::Late | ViolationType::LeftEarly => true,
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ABSENT" | "TIDAK_HADIR" => Ok(ViolationType::Absent),
            "LATE" | "TELAT" => Ok(ViolationType::Late),
            "LEFT_EARLY" | "PULANG_CEPAT" => Ok(ViolationType::LeftEarly),
            other => Err(ValidationError::new(format!(
                "unknown violation_type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_aliases() {
        assert_eq!("telat".parse::<ViolationType>().unwrap(), ViolationType::Late);
        assert_eq!(
            "TIDAK_HADIR".parse::<ViolationType>().unwrap(),
            ViolationType::Absent
        );
        let parsed: ViolationType = serde_json::from_str("\"PULANG_CEPAT\"").unwrap();
        assert_eq!(parsed, ViolationType::LeftEarly);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"LEFT_EARLY\"");
        assert!("EARLY".parse::<ViolationType>().is_err());
    }
}
