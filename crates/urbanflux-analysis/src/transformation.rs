//! Transformation state: certainty, intensity and nature for one location.
//!
//! Everything here is a pure function of the location's event types, so
//! recomputing an unchanged event set yields an identical state.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use urbanflux_core::errors::TransformationError;
use urbanflux_core::model::{Certainty, EventType, LocationEvents, Nature, TransformationState};

use crate::certainty::derive_certainty;

/// Repeats of one event type stop adding weight after this many.
const MAX_COUNTED_REPEATS: u32 = 5;

pub fn event_weight(event_type: EventType) -> u32 {
    match event_type {
        EventType::NewBuilding => 40,
        EventType::Demolition => 35,
        EventType::ConstructionStarted | EventType::ConstructionCompleted => 30,
        EventType::MajorAlteration | EventType::UlurpApproved => 25,
        EventType::NonUlurpApproved | EventType::FeisSubmitted | EventType::ReviewCompleted => 20,
        EventType::UlurpFiled => 15,
        EventType::DeisSubmitted => 12,
        EventType::NonUlurpFiled => 10,
        EventType::EasSubmitted | EventType::MinorAlteration => 8,
        EventType::ReviewActive => 5,
        EventType::Scaffold | EventType::EquipmentWork => 3,
        EventType::Plumbing | EventType::Other | EventType::ViolationIssued => 2,
        EventType::ComplaintFiled => 1,
        EventType::UlurpDenied | EventType::ParcelRecorded | EventType::BoundaryRecorded => 0,
    }
}

fn tier_factor(certainty: Certainty) -> f64 {
    match certainty {
        Certainty::Discussion => 0.6,
        Certainty::Probable => 0.85,
        Certainty::Certain => 1.0,
    }
}

/// The nature an event type votes for, if any.
pub fn nature_vote(event_type: EventType) -> Option<Nature> {
    match event_type {
        EventType::NewBuilding => Some(Nature::NewConstruction),
        EventType::Demolition => Some(Nature::Demolition),
        EventType::MajorAlteration | EventType::MinorAlteration => Some(Nature::Alteration),
        EventType::UlurpFiled
        | EventType::UlurpApproved
        | EventType::UlurpDenied
        | EventType::NonUlurpFiled
        | EventType::NonUlurpApproved
        | EventType::EasSubmitted
        | EventType::DeisSubmitted
        | EventType::FeisSubmitted
        | EventType::ReviewCompleted
        | EventType::ReviewActive => Some(Nature::Rezoning),
        EventType::Scaffold
        | EventType::EquipmentWork
        | EventType::Plumbing
        | EventType::Other
        | EventType::ViolationIssued
        | EventType::ComplaintFiled => Some(Nature::Maintenance),
        EventType::ConstructionStarted
        | EventType::ConstructionCompleted
        | EventType::ParcelRecorded
        | EventType::BoundaryRecorded => None,
    }
}

/// Tie order for nature votes.
const NATURE_PRIORITY: [Nature; 5] = [
    Nature::NewConstruction,
    Nature::Demolition,
    Nature::Alteration,
    Nature::Rezoning,
    Nature::Maintenance,
];

fn type_counts(event_types: &[EventType]) -> [u32; EventType::ALL.len()] {
    let mut counts = [0u32; EventType::ALL.len()];
    for t in event_types {
        counts[t.ordinal()] += 1;
    }
    counts
}

/// Intensity in `[0, 100]`, one decimal.
///
/// Each type contributes `weight * (1 + (min(count, 5) - 1) / 2)`; the sum is
/// scaled by the certainty tier.
pub fn compute_intensity(event_types: &[EventType], certainty: Certainty) -> f64 {
    let counts = type_counts(event_types);
    // Twice the weighted sum, so the half-steps stay integral.
    let doubled: u32 = EventType::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(t, count)| event_weight(*t) * (count.min(MAX_COUNTED_REPEATS) + 1))
        .sum();
    let raw = f64::from(doubled) / 2.0 * tier_factor(certainty);
    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Dominant kind of change: highest summed weight, then most events, then
/// [`NATURE_PRIORITY`] order. No votes at all is `Mixed`.
pub fn compute_nature(event_types: &[EventType]) -> Nature {
    let mut tally = [(0u32, 0u32); NATURE_PRIORITY.len()];
    for t in event_types {
        if let Some(nature) = nature_vote(*t) {
            if let Some(slot) = NATURE_PRIORITY.iter().position(|n| *n == nature) {
                tally[slot].0 += event_weight(*t);
                tally[slot].1 += 1;
            }
        }
    }

    let mut best: Option<(usize, (u32, u32))> = None;
    for (slot, score) in tally.iter().enumerate() {
        if score.1 == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| *score > top) {
            best = Some((slot, *score));
        }
    }
    best.map_or(Nature::Mixed, |(slot, _)| NATURE_PRIORITY[slot])
}

pub fn compute_state(
    location_id: i64,
    event_types: &[EventType],
    computed_at: DateTime<Utc>,
) -> TransformationState {
    let certainty = derive_certainty(event_types.iter().copied());
    TransformationState {
        location_id,
        certainty,
        intensity: compute_intensity(event_types, certainty),
        nature: compute_nature(event_types),
        computed_at,
    }
}

/// Parse a location's stored event types. One unknown type fails the location.
pub fn event_types_of(location: &LocationEvents) -> Result<Vec<EventType>, TransformationError> {
    location
        .events
        .iter()
        .map(|e| {
            EventType::from_str(&e.event_type).map_err(|source| TransformationError::InvalidEvent {
                location_id: location.location.id,
                source,
            })
        })
        .collect()
}
