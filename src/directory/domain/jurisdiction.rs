//! Administrative location fields shared by issues and accounts.

use serde::{Deserialize, Serialize};

/// The (state, district, taluka) triple scoping an issue or a representative.
///
/// Blank values are normalized to `None`. Comparisons are case-insensitive,
/// and an absent field never matches anything, including another absent
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jurisdiction {
    state: Option<String>,
    district: Option<String>,
    taluka: Option<String>,
}

impl Jurisdiction {
    /// Creates an empty jurisdiction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a jurisdiction from optional raw fields.
    #[must_use]
    pub fn from_parts(
        state: Option<String>,
        district: Option<String>,
        taluka: Option<String>,
    ) -> Self {
        Self {
            state: state.and_then(normalize),
            district: district.and_then(normalize),
            taluka: taluka.and_then(normalize),
        }
    }

    /// Sets the state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = normalize(state.into());
        self
    }

    /// Sets the district.
    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = normalize(district.into());
        self
    }

    /// Sets the taluka.
    #[must_use]
    pub fn with_taluka(mut self, taluka: impl Into<String>) -> Self {
        self.taluka = normalize(taluka.into());
        self
    }

    /// Returns the state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the district, if any.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// Returns the taluka, if any.
    #[must_use]
    pub fn taluka(&self) -> Option<&str> {
        self.taluka.as_deref()
    }

    /// Returns `true` when both jurisdictions name the same state.
    #[must_use]
    pub fn shares_state(&self, other: &Self) -> bool {
        field_matches(self.state(), other.state())
    }

    /// Returns `true` when both jurisdictions name the same district within
    /// the same state.
    #[must_use]
    pub fn shares_district(&self, other: &Self) -> bool {
        field_matches(self.district(), other.district()) && self.shares_state(other)
    }

    /// Returns `true` when both jurisdictions name the same taluka.
    #[must_use]
    pub fn shares_taluka(&self, other: &Self) -> bool {
        field_matches(self.taluka(), other.taluka())
    }
}

/// Compares two optional location fields case-insensitively.
///
/// Returns `false` when either side is absent.
#[must_use]
pub(crate) fn field_matches(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (Some(lhs), Some(rhs)) => lhs.to_lowercase() == rhs.to_lowercase(),
        _ => false,
    }
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
