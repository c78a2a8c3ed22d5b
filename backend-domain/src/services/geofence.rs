use serde::{Deserialize, Serialize};

use crate::entities::Checkpoint;
use crate::value_objects::Coordinate;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FenceResult {
    Inside,
    Outside,
}

/// Great-circle distance using the haversine formula.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}

/// Inclusive at the boundary. A missing or non-finite coordinate fails closed.
pub fn validate_fence(center: &Coordinate, radius_meters: f64, reported: Option<&Coordinate>) -> FenceResult {
    let Some(reported) = reported else {
        return FenceResult::Outside;
    };
    if reported.validate().is_err() {
        return FenceResult::Outside;
    }
    if distance_meters(center, reported) <= radius_meters {
        FenceResult::Inside
    } else {
        FenceResult::Outside
    }
}

pub fn validate(checkpoint: &Checkpoint, reported: Option<&Coordinate>) -> FenceResult {
    validate_fence(&checkpoint.coordinate(), checkpoint.radius_meters, reported)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Coordinate = Coordinate {
        lat: -6.2000,
        lng: 106.8000,
    };

    /// Point `meters` due north of CENTER.
    fn north_of_center(meters: f64) -> Coordinate {
        Coordinate {
            lat: CENTER.lat + (meters / EARTH_RADIUS_METERS).to_degrees(),
            lng: CENTER.lng,
        }
    }

    #[test]
    fn distance_matches_known_offset() {
        let distance = distance_meters(&CENTER, &north_of_center(80.0));
        assert!((distance - 80.0).abs() < 0.01, "distance was {}", distance);
        assert_eq!(distance_meters(&CENTER, &CENTER), 0.0);
    }

    #[test]
    fn inside_and_outside_radius() {
        assert_eq!(
            validate_fence(&CENTER, 50.0, Some(&north_of_center(10.0))),
            FenceResult::Inside
        );
        assert_eq!(
            validate_fence(&CENTER, 50.0, Some(&north_of_center(80.0))),
            FenceResult::Outside
        );
        let east = Coordinate {
            lat: CENTER.lat,
            lng: CENTER.lng + 0.001,
        };
        assert_eq!(validate_fence(&CENTER, 50.0, Some(&east)), FenceResult::Outside);
        assert_eq!(validate_fence(&CENTER, 200.0, Some(&east)), FenceResult::Inside);
    }

    #[test]
    fn boundary_is_inclusive() {
        let point = north_of_center(50.0);
        let exact = distance_meters(&CENTER, &point);
        assert_eq!(validate_fence(&CENTER, exact, Some(&point)), FenceResult::Inside);
        assert_eq!(
            validate_fence(&CENTER, exact - 0.001, Some(&point)),
            FenceResult::Outside
        );
    }

    #[test]
    fn missing_or_invalid_coordinate_fails_closed() {
        assert_eq!(validate_fence(&CENTER, 50.0, None), FenceResult::Outside);
        let nan = Coordinate {
            lat: f64::NAN,
            lng: CENTER.lng,
        };
        assert_eq!(validate_fence(&CENTER, 50.0, Some(&nan)), FenceResult::Outside);
    }
}
