use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// How likely an observed change is to materialize.
///
/// Ordered: `Discussion < Probable < Certain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Certainty {
    Discussion,
    Probable,
    Certain,
}

impl Certainty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discussion => "discussion",
            Self::Probable => "probable",
            Self::Certain => "certain",
        }
    }

    /// Fill opacity used when rendering a location of this tier.
    pub fn opacity(self) -> f64 {
        match self {
            Self::Discussion => 0.4,
            Self::Probable => 0.7,
            Self::Certain => 1.0,
        }
    }

    /// Only talk-stage changes render with a tentative (dashed) outline.
    pub fn shows_dashed_border(self) -> bool {
        matches!(self, Self::Discussion)
    }
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Certainty {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discussion" => Ok(Self::Discussion),
            "probable" => Ok(Self::Probable),
            "certain" => Ok(Self::Certain),
            other => Err(ModelError::unknown("certainty", other)),
        }
    }
}
