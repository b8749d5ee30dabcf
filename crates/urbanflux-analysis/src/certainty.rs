//! Certainty tiers: how likely the change seen at a location is to happen.

use urbanflux_core::model::{Certainty, EventType};

/// Tier membership, scanned top-down; the first tier with a matching event wins.
const TIERS: [(Certainty, &[EventType]); 3] = [
    (
        Certainty::Certain,
        &[EventType::ConstructionStarted, EventType::ConstructionCompleted],
    ),
    (
        Certainty::Probable,
        &[
            EventType::NewBuilding,
            EventType::MajorAlteration,
            EventType::Demolition,
            EventType::UlurpApproved,
            EventType::NonUlurpApproved,
            EventType::FeisSubmitted,
            EventType::ReviewCompleted,
        ],
    ),
    (
        Certainty::Discussion,
        &[
            EventType::UlurpFiled,
            EventType::NonUlurpFiled,
            EventType::EasSubmitted,
            EventType::DeisSubmitted,
        ],
    ),
];

/// Derive the tier for a location's event types.
///
/// No events and no recognized events both fall back to `Discussion`.
pub fn derive_certainty<I>(event_types: I) -> Certainty
where
    I: IntoIterator<Item = EventType>,
{
    let present: Vec<EventType> = event_types.into_iter().collect();
    TIERS
        .iter()
        .find(|(_, members)| present.iter().any(|t| members.contains(t)))
        .map_or(Certainty::Discussion, |(tier, _)| *tier)
}

pub fn certainty_opacity(certainty: Certainty) -> f64 {
    certainty.opacity()
}

/// Tentative changes are drawn with a dashed outline.
pub fn should_show_dashed_border(certainty: Certainty) -> bool {
    certainty.shows_dashed_border()
}
