use chrono::{DateTime, TimeDelta, Utc};

use crate::entities::{CheckInEvent, Checkpoint, EventType, EvidenceOutcome, FineSettings, RejectionReason, Shift};
use crate::services::geofence::{self, FenceResult};
use crate::services::qr_token;
use crate::value_objects::{Coordinate, Verdict, ViolationType};

/// Geofence first, then token. A submission failing both reports OUT_OF_RANGE.
pub fn assess_evidence(
    checkpoint: &Checkpoint,
    reported: Option<&Coordinate>,
    submitted_token: &str,
) -> EvidenceOutcome {
    if geofence::validate(checkpoint, reported) == FenceResult::Outside {
        return EvidenceOutcome::Rejected(RejectionReason::OutOfRange);
    }
    if !qr_token::validate_token(checkpoint, submitted_token) {
        return EvidenceOutcome::Rejected(RejectionReason::InvalidToken);
    }
    EvidenceOutcome::Accepted
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evidence<'a> {
    pub arrival: Option<&'a CheckInEvent>,
    pub departure: Option<&'a CheckInEvent>,
}

/// Picks the authoritative pair from accepted events:
/// the earliest ARRIVAL at or before the shift end, and the earliest
/// DEPARTURE at or after that arrival. Later duplicates are ignored.
pub fn authoritative_evidence<'a>(shift: &Shift, events: &'a [CheckInEvent]) -> Evidence<'a> {
    let ordered = |a: &&CheckInEvent, b: &&CheckInEvent| {
        a.occurred_at
            .cmp(&b.occurred_at)
            .then(a.received_at.cmp(&b.received_at))
            .then(a.id.cmp(&b.id))
    };

    let arrival = events
        .iter()
        .filter(|event| event.shift_id == shift.id)
        .filter(|event| event.event_type == EventType::Arrival)
        .filter(|event| event.occurred_at <= shift.ends_at)
        .min_by(ordered);

    let departure = arrival.and_then(|arrival| {
        events
            .iter()
            .filter(|event| event.shift_id == shift.id)
            .filter(|event| event.event_type == EventType::Departure)
            .filter(|event| event.occurred_at >= arrival.occurred_at)
            .min_by(ordered)
    });

    Evidence { arrival, departure }
}

/// Evaluates the attendance rules in order: ABSENT, LATE, LEFT_EARLY, ON_TIME.
/// LATE short-circuits before the departure is looked at, so a shift carries at
/// most one violation.
pub fn classify(
    shift: &Shift,
    arrival: Option<&CheckInEvent>,
    departure: Option<&CheckInEvent>,
    settings: &FineSettings,
) -> Verdict {
    let Some(arrival) = arrival.filter(|event| event.occurred_at <= shift.ends_at) else {
        return Verdict::Absent;
    };

    let lateness = arrival.occurred_at - shift.starts_at;
    if lateness > settings.tolerance(ViolationType::Late) {
        return Verdict::Late;
    }

    if let Some(departure) = departure {
        let early_by = shift.ends_at - departure.occurred_at;
        if early_by > settings.tolerance(ViolationType::LeftEarly) {
            return Verdict::LeftEarly;
        }
    }

    Verdict::OnTime
}

/// A LATE verdict stays provisional until no delayed scan can displace its
/// arrival: any later submission carries a client timestamp no earlier than
/// `now - max_clock_skew`. Other verdicts cannot be improved by more evidence.
pub fn verdict_is_settled(
    verdict: Verdict,
    evidence: &Evidence<'_>,
    now: DateTime<Utc>,
    max_clock_skew: TimeDelta,
) -> bool {
    match (verdict, evidence.arrival) {
        (Verdict::Late, Some(arrival)) => arrival
            .occurred_at
            .checked_add_signed(max_clock_skew)
            .map_or(false, |settled_at| now >= settled_at),
        _ => true,
    }
}

pub fn classify_events(shift: &Shift, events: &[CheckInEvent], settings: &FineSettings) -> Verdict {
    let evidence = authoritative_evidence(shift, events);
    classify(shift, evidence.arrival, evidence.departure, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::FineSetting;
    use crate::value_objects::{CheckpointId, MemberId, ShiftId};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
    }

    fn night_shift() -> Shift {
        Shift {
            id: ShiftId::from("shift-1"),
            member_id: MemberId::from("m-1"),
            checkpoint_id: CheckpointId::from("cp-1"),
            starts_at: at(22, 0),
            ends_at: at(23, 0),
        }
    }

    fn event(id: &str, event_type: EventType, occurred_at: DateTime<Utc>) -> CheckInEvent {
        CheckInEvent {
            id: id.to_string(),
            shift_id: ShiftId::from("shift-1"),
            event_type,
            occurred_at,
            received_at: occurred_at,
            coordinate: Coordinate {
                lat: -6.2,
                lng: 106.8,
            },
            token_rotated_at: at(12, 0),
        }
    }

    fn settings(late_tolerance: i64, early_tolerance: i64) -> FineSettings {
        let now = at(12, 0);
        FineSettings::new(vec![
            FineSetting {
                violation_type: ViolationType::Late,
                amount: 20_000,
                tolerance_minutes: late_tolerance,
                is_active: true,
                updated_at: now,
            },
            FineSetting {
                violation_type: ViolationType::LeftEarly,
                amount: 15_000,
                tolerance_minutes: early_tolerance,
                is_active: true,
                updated_at: now,
            },
        ])
    }

    #[test]
    fn no_arrival_is_absent() {
        assert_eq!(classify(&night_shift(), None, None, &settings(15, 0)), Verdict::Absent);
    }

    #[test]
    fn arrival_after_shift_end_is_absent() {
        let arrival = event("a", EventType::Arrival, at(23, 1));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), None, &settings(15, 0)),
            Verdict::Absent
        );
        let events = vec![arrival];
        assert!(authoritative_evidence(&night_shift(), &events).arrival.is_none());
    }

    #[test]
    fn lateness_equal_to_tolerance_is_on_time() {
        let arrival = event("a", EventType::Arrival, at(22, 15));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), None, &settings(15, 0)),
            Verdict::OnTime
        );
        let arrival = event("a", EventType::Arrival, at(22, 16));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), None, &settings(15, 0)),
            Verdict::Late
        );
    }

    #[test]
    fn early_arrival_is_on_time() {
        let arrival = event("a", EventType::Arrival, at(21, 40));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), None, &settings(0, 0)),
            Verdict::OnTime
        );
    }

    #[test]
    fn departure_before_tolerance_is_left_early() {
        let arrival = event("a", EventType::Arrival, at(22, 5));
        let departure = event("d", EventType::Departure, at(22, 50));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), Some(&departure), &settings(15, 0)),
            Verdict::LeftEarly
        );
        assert_eq!(
            classify(&night_shift(), Some(&arrival), Some(&departure), &settings(15, 10)),
            Verdict::OnTime
        );
    }

    #[test]
    fn late_short_circuits_left_early() {
        let arrival = event("a", EventType::Arrival, at(22, 30));
        let departure = event("d", EventType::Departure, at(22, 40));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), Some(&departure), &settings(15, 0)),
            Verdict::Late
        );
    }

    #[test]
    fn earliest_arrival_wins() {
        let events = vec![
            event("late-scan", EventType::Arrival, at(22, 40)),
            event("first-scan", EventType::Arrival, at(22, 3)),
            event("dup-scan", EventType::Arrival, at(22, 20)),
        ];
        let evidence = authoritative_evidence(&night_shift(), &events);
        assert_eq!(evidence.arrival.map(|e| e.id.as_str()), Some("first-scan"));
        assert_eq!(classify_events(&night_shift(), &events, &settings(15, 0)), Verdict::OnTime);
    }

    #[test]
    fn departure_before_arrival_is_ignored() {
        let events = vec![
            event("d-early", EventType::Departure, at(21, 50)),
            event("a", EventType::Arrival, at(22, 0)),
            event("d", EventType::Departure, at(23, 0)),
            event("d-dup", EventType::Departure, at(23, 5)),
        ];
        let evidence = authoritative_evidence(&night_shift(), &events);
        assert_eq!(evidence.departure.map(|e| e.id.as_str()), Some("d"));
        assert_eq!(classify_events(&night_shift(), &events, &settings(0, 0)), Verdict::OnTime);
    }

    #[test]
    fn oversized_tolerance_never_overflows() {
        let arrival = event("a", EventType::Arrival, at(22, 59));
        let departure = event("d", EventType::Departure, at(22, 59));
        assert_eq!(
            classify(
                &night_shift(),
                Some(&arrival),
                Some(&departure),
                &settings(i64::MAX, i64::MAX)
            ),
            Verdict::OnTime
        );
    }

    #[test]
    fn late_verdict_settles_after_the_skew_window() {
        let events = vec![event("a", EventType::Arrival, at(22, 16))];
        let evidence = authoritative_evidence(&night_shift(), &events);
        let skew = TimeDelta::minutes(5);
        assert!(!verdict_is_settled(Verdict::Late, &evidence, at(22, 16), skew));
        assert!(!verdict_is_settled(Verdict::Late, &evidence, at(22, 20), skew));
        assert!(verdict_is_settled(Verdict::Late, &evidence, at(22, 21), skew));
        assert!(verdict_is_settled(Verdict::LeftEarly, &evidence, at(22, 16), skew));
        assert!(verdict_is_settled(Verdict::OnTime, &evidence, at(22, 16), skew));
        assert!(verdict_is_settled(Verdict::Late, &evidence, at(22, 16), TimeDelta::zero()));
    }

    #[test]
    fn missing_settings_mean_zero_tolerance() {
        let arrival = event("a", EventType::Arrival, at(22, 1));
        assert_eq!(
            classify(&night_shift(), Some(&arrival), None, &FineSettings::default()),
            Verdict::Late
        );
    }
}
