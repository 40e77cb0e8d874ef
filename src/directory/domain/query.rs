//! Representative selection predicate.

use super::{RepresentativeLevel, User, jurisdiction::field_matches};

/// Filter used to select representatives from the directory.
///
/// Every populated field must match the representative's own field
/// case-insensitively. Citizens never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepresentativeQuery {
    level: Option<RepresentativeLevel>,
    state: Option<String>,
    district: Option<String>,
    taluka: Option<String>,
}

impl RepresentativeQuery {
    /// Selects representatives at exactly the given tier.
    #[must_use]
    pub fn at_level(level: RepresentativeLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    /// Selects representatives at any tier.
    #[must_use]
    pub fn any_level() -> Self {
        Self::default()
    }

    /// Restricts the selection to a state.
    #[must_use]
    pub fn in_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Restricts the selection to a district.
    #[must_use]
    pub fn in_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    /// Restricts the selection to a taluka.
    #[must_use]
    pub fn in_taluka(mut self, taluka: impl Into<String>) -> Self {
        self.taluka = Some(taluka.into());
        self
    }

    /// Returns the required tier, if any.
    #[must_use]
    pub const fn level(&self) -> Option<RepresentativeLevel> {
        self.level
    }

    /// Returns the required state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the required district, if any.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// Returns the required taluka, if any.
    #[must_use]
    pub fn taluka(&self) -> Option<&str> {
        self.taluka.as_deref()
    }

    /// Evaluates the predicate against an account.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let Some(user_level) = user.representative_level() else {
            return false;
        };
        if self.level.is_some_and(|level| level != user_level) {
            return false;
        }

        let jurisdiction = user.jurisdiction();
        [
            (self.state(), jurisdiction.state()),
            (self.district(), jurisdiction.district()),
            (self.taluka(), jurisdiction.taluka()),
        ]
        .into_iter()
        .all(|(wanted, actual)| wanted.is_none() || field_matches(wanted, actual))
    }
}
