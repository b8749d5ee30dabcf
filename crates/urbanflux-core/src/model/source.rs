use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// The closed set of external open-data feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Zoning application portal (ULURP / non-ULURP land-use applications).
    ZoningApplications,
    /// Environmental review registry (CEQR projects).
    EnvironmentalReview,
    /// Building-permit job filings.
    PermitFilings,
    /// Building violations.
    Violations,
    /// Building complaints.
    Complaints,
    /// Certificates of occupancy.
    CertificatesOfOccupancy,
    /// Parcel / land-use registry.
    Parcels,
    /// Administrative boundaries (neighborhood tabulation areas).
    Boundaries,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Source::ZoningApplications,
        Source::EnvironmentalReview,
        Source::PermitFilings,
        Source::Violations,
        Source::Complaints,
        Source::CertificatesOfOccupancy,
        Source::Parcels,
        Source::Boundaries,
    ];

    /// Stable name persisted in `events.source` and used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZoningApplications => "zap",
            Self::EnvironmentalReview => "ceqr",
            Self::PermitFilings => "dob_permits",
            Self::Violations => "dob_violations",
            Self::Complaints => "dob_complaints",
            Self::CertificatesOfOccupancy => "dob_certificates",
            Self::Parcels => "pluto",
            Self::Boundaries => "nta_boundaries",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|src| src.as_str() == s)
            .ok_or_else(|| ModelError::unknown("source", s))
    }
}
