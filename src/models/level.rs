//! Administrative level ranking for region hierarchy walks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Region granularity, ordered from most granular to least granular.
///
/// The derived `Ord` follows declaration order, so `a < b` means `a` is
/// more granular than `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    Subterritory,
    Territory,
    SubcountryGroup,
    Country,
    SharedLandform,
    IntermediateRegion,
    Subregion,
    Region,
    Subunion,
    Union,
    UnitedNations,
    World,
}

impl Level {
    /// Get all levels in rank order (most granular first)
    pub fn all() -> &'static [Level] {
        &[
            Level::Subterritory,
            Level::Territory,
            Level::SubcountryGroup,
            Level::Country,
            Level::SharedLandform,
            Level::IntermediateRegion,
            Level::Subregion,
            Level::Region,
            Level::Subunion,
            Level::Union,
            Level::UnitedNations,
            Level::World,
        ]
    }

    /// Position in the rank list; lower is more granular
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Get the dataset name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Subterritory => "subterritory",
            Level::Territory => "territory",
            Level::SubcountryGroup => "subcountryGroup",
            Level::Country => "country",
            Level::SharedLandform => "sharedLandform",
            Level::IntermediateRegion => "intermediateRegion",
            Level::Subregion => "subregion",
            Level::Region => "region",
            Level::Subunion => "subunion",
            Level::Union => "union",
            Level::UnitedNations => "unitedNations",
            Level::World => "world",
        }
    }

    /// True when `self` lies in the inclusive range `target..=max`.
    pub fn within(&self, target: Level, max: Level) -> bool {
        target <= *self && *self <= max
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for Level {
    type Err = UnknownLevel;

    // Exact match only; level names are case-sensitive in the dataset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::all()
            .iter()
            .find(|level| level.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}
