use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Coarse category of the change underway at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    NewConstruction,
    Demolition,
    Alteration,
    Rezoning,
    Maintenance,
    /// No dominant kind of change; also the empty-cell sentinel.
    Mixed,
}

impl Nature {
    pub const ALL: [Nature; 6] = [
        Nature::NewConstruction,
        Nature::Demolition,
        Nature::Alteration,
        Nature::Rezoning,
        Nature::Maintenance,
        Nature::Mixed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewConstruction => "new_construction",
            Self::Demolition => "demolition",
            Self::Alteration => "alteration",
            Self::Rezoning => "rezoning",
            Self::Maintenance => "maintenance",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nature {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| ModelError::unknown("nature", s))
    }
}
