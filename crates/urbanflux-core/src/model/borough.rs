//! Borough vocabulary and the per-source normalization policy.
//!
//! Feeds encode boroughs as numeric codes (`1`-`5`), two-letter abbreviations
//! (`MN/BX/BK/QN/SI`), or full names in any case. All of them normalize to one
//! of the five canonical names.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Bronx,
    Brooklyn,
    Queens,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "Manhattan",
            Self::Bronx => "Bronx",
            Self::Brooklyn => "Brooklyn",
            Self::Queens => "Queens",
            Self::StatenIsland => "Staten Island",
        }
    }

    /// Numeric borough code, also the leading digit of a BBL.
    pub fn code(self) -> u8 {
        match self {
            Self::Manhattan => 1,
            Self::Bronx => 2,
            Self::Brooklyn => 3,
            Self::Queens => 4,
            Self::StatenIsland => 5,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Manhattan => "MN",
            Self::Bronx => "BX",
            Self::Brooklyn => "BK",
            Self::Queens => "QN",
            Self::StatenIsland => "SI",
        }
    }

    /// Single-letter prefix used by planning-department district codes (`K01`).
    fn planning_letter(self) -> char {
        match self {
            Self::Manhattan => 'M',
            Self::Bronx => 'X',
            Self::Brooklyn => 'K',
            Self::Queens => 'Q',
            Self::StatenIsland => 'R',
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.code() == code)
    }

    /// Parse any recognized borough token. Unknown or blank tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if token.bytes().all(|b| b.is_ascii_digit()) {
            return token.parse::<u8>().ok().and_then(Self::from_code);
        }
        let folded = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        Self::ALL.into_iter().find(|b| {
            folded == b.abbreviation() || folded == b.name().to_ascii_uppercase()
        })
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a source does with a borough token it cannot map.
///
/// Most feeds drop it; the zoning portal keeps the raw token (it publishes
/// `Citywide` and multi-borough values that consumers still display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoroughPolicy {
    Drop,
    PassThrough,
}

impl BoroughPolicy {
    /// Normalize a raw borough field under this policy.
    ///
    /// Recognized tokens always become the canonical name. Blank tokens are
    /// absent under both policies.
    pub fn normalize(self, raw: Option<&str>) -> Option<String> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }
        match Borough::parse(raw) {
            Some(borough) => Some(borough.name().to_string()),
            None => match self {
                Self::Drop => None,
                Self::PassThrough => Some(raw.to_string()),
            },
        }
    }
}

/// Normalize a community district to its three-digit form (`301`).
///
/// Accepts the three-digit form, borough-prefixed forms (`BK01`, `BK 1`,
/// `Brooklyn 1`) and planning-department letters (`K01`). Anything else is
/// kept trimmed and upper-cased.
pub fn normalize_community_district(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.len() == 3 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return Some(raw.to_string());
    }
    let split = raw
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (prefix, digits) = raw.split_at(split);
    let prefix = prefix.trim();
    let district = digits.trim().parse::<u8>().ok().filter(|d| (1..=18).contains(d));
    let borough = if prefix.len() == 1 {
        prefix
            .chars()
            .next()
            .and_then(|c| {
                Borough::ALL
                    .into_iter()
                    .find(|b| b.planning_letter() == c.to_ascii_uppercase())
            })
    } else {
        Borough::parse(prefix)
    };
    match (borough, district) {
        (Some(b), Some(d)) => Some(format!("{}{:02}", b.code(), d)),
        _ => Some(raw.to_ascii_uppercase()),
    }
}
