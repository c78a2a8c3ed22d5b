// Checkpoint entity
// A physical patrol post with its geofence and current QR token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::services::qr_token;
use crate::value_objects::{CheckpointId, Coordinate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: f64,
    pub qr_token: String,
    pub token_rotated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// String encoded into the printed QR code.
    pub fn qr_payload(&self) -> String {
        qr_token::encode_payload(&self.id, &self.qr_token)
    }
}

/// Registration / edit payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDraft {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: f64,
}

impl CheckpointDraft {
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::new("name must not be empty"));
        }
        Coordinate::new(self.lat, self.lng)?;
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(ValidationError::new(format!(
                "radius_meters must be > 0, got {}",
                self.radius_meters
            )));
        }
        Ok(Self {
            name,
            lat: self.lat,
            lng: self.lng,
            radius_meters: self.radius_meters,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckpointView {
    #[serde(flatten)]
    pub checkpoint: Checkpoint,
    pub qr_payload: String,
}

impl From<Checkpoint> for CheckpointView {
    fn from(checkpoint: Checkpoint) -> Self {
        let qr_payload = checkpoint.qr_payload();
        Self {
            checkpoint,
            qr_payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(radius: f64) -> CheckpointDraft {
        CheckpointDraft {
            name: "  Pos Ronda Utara ".to_string(),
            lat: -6.2,
            lng: 106.8,
            radius_meters: radius,
        }
    }

    #[test]
    fn normalized_trims_name() {
        let normalized = draft(50.0).normalized().expect("valid draft");
        assert_eq!(normalized.name, "Pos Ronda Utara");
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(draft(0.0).normalized().is_err());
        assert!(draft(-5.0).normalized().is_err());
        assert!(draft(f64::INFINITY).normalized().is_err());
    }

    #[test]
    fn rejects_bad_coordinate() {
        let mut bad = draft(50.0);
        bad.lat = 91.0;
        let err = bad.normalized().expect_err("latitude out of range");
        assert!(err.to_string().contains("latitude"));
    }
}
