//! Administrative escalation tiers.

use super::ParseEscalationLevelError;
use crate::directory::domain::RepresentativeLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal administrative tier an issue currently sits at.
///
/// Serialized as its ordinal (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EscalationLevel {
    /// Level 0: handled by the taluka representatives.
    Taluka,
    /// Level 1: escalated to the district representative.
    District,
    /// Level 2: escalated to the state representative. Terminal.
    State,
}

impl EscalationLevel {
    /// Returns the ordinal value.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Taluka => 0,
            Self::District => 1,
            Self::State => 2,
        }
    }

    /// Returns the tier above this one, or `None` at the State tier.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Taluka => Some(Self::District),
            Self::District => Some(Self::State),
            Self::State => None,
        }
    }

    /// Returns `true` when no further escalation target exists.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.next().is_none()
    }

    /// Returns the representative tier that owns issues at this level.
    #[must_use]
    pub const fn representative_level(self) -> RepresentativeLevel {
        match self {
            Self::Taluka => RepresentativeLevel::Taluka,
            Self::District => RepresentativeLevel::District,
            Self::State => RepresentativeLevel::State,
        }
    }
}

impl fmt::Display for EscalationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<EscalationLevel> for u8 {
    fn from(level: EscalationLevel) -> Self {
        level.value()
    }
}

impl TryFrom<i64> for EscalationLevel {
    type Error = ParseEscalationLevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Taluka),
            1 => Ok(Self::District),
            2 => Ok(Self::State),
            _ => Err(ParseEscalationLevelError(value)),
        }
    }
}

impl TryFrom<u8> for EscalationLevel {
    type Error = ParseEscalationLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}
