use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Controlled vocabulary of change-relevant occurrences.
///
/// Variant order is the canonical scan order used wherever per-type
/// aggregates must be summed deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Zoning applications
    UlurpFiled,
    UlurpApproved,
    UlurpDenied,
    NonUlurpFiled,
    NonUlurpApproved,
    // Environmental review
    EasSubmitted,
    DeisSubmitted,
    FeisSubmitted,
    ReviewCompleted,
    ReviewActive,
    // Permit filings
    NewBuilding,
    MajorAlteration,
    MinorAlteration,
    Demolition,
    Scaffold,
    EquipmentWork,
    Plumbing,
    Other,
    // Enforcement
    ViolationIssued,
    ComplaintFiled,
    // Construction milestones
    ConstructionStarted,
    ConstructionCompleted,
    // Reference registries
    ParcelRecorded,
    BoundaryRecorded,
}

impl EventType {
    pub const ALL: [EventType; 24] = [
        EventType::UlurpFiled,
        EventType::UlurpApproved,
        EventType::UlurpDenied,
        EventType::NonUlurpFiled,
        EventType::NonUlurpApproved,
        EventType::EasSubmitted,
        EventType::DeisSubmitted,
        EventType::FeisSubmitted,
        EventType::ReviewCompleted,
        EventType::ReviewActive,
        EventType::NewBuilding,
        EventType::MajorAlteration,
        EventType::MinorAlteration,
        EventType::Demolition,
        EventType::Scaffold,
        EventType::EquipmentWork,
        EventType::Plumbing,
        EventType::Other,
        EventType::ViolationIssued,
        EventType::ComplaintFiled,
        EventType::ConstructionStarted,
        EventType::ConstructionCompleted,
        EventType::ParcelRecorded,
        EventType::BoundaryRecorded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UlurpFiled => "ulurp_filed",
            Self::UlurpApproved => "ulurp_approved",
            Self::UlurpDenied => "ulurp_denied",
            Self::NonUlurpFiled => "non_ulurp_filed",
            Self::NonUlurpApproved => "non_ulurp_approved",
            Self::EasSubmitted => "eas_submitted",
            Self::DeisSubmitted => "deis_submitted",
            Self::FeisSubmitted => "feis_submitted",
            Self::ReviewCompleted => "review_completed",
            Self::ReviewActive => "review_active",
            Self::NewBuilding => "new_building",
            Self::MajorAlteration => "major_alteration",
            Self::MinorAlteration => "minor_alteration",
            Self::Demolition => "demolition",
            Self::Scaffold => "scaffold",
            Self::EquipmentWork => "equipment_work",
            Self::Plumbing => "plumbing",
            Self::Other => "other",
            Self::ViolationIssued => "violation_issued",
            Self::ComplaintFiled => "complaint_filed",
            Self::ConstructionStarted => "construction_started",
            Self::ConstructionCompleted => "construction_completed",
            Self::ParcelRecorded => "parcel_recorded",
            Self::BoundaryRecorded => "boundary_recorded",
        }
    }

    /// Position in [`EventType::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::unknown("event type", s))
    }
}
