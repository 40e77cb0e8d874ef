//! Citizen and representative accounts.

use super::{DirectoryDomainError, Jurisdiction, ParseRepresentativeLevelError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum username length, matching the `VARCHAR(150)` column.
const MAX_USERNAME_LENGTH: usize = 150;

/// Administrative tier a representative answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepresentativeLevel {
    /// Village-level representative.
    Village,
    /// Taluka-level representative; the first tier an issue is routed to.
    Taluka,
    /// District-level representative.
    District,
    /// State-level representative; the final escalation tier.
    State,
}

impl RepresentativeLevel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Village => "VILLAGE",
            Self::Taluka => "TALUKA",
            Self::District => "DISTRICT",
            Self::State => "STATE",
        }
    }
}

impl fmt::Display for RepresentativeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RepresentativeLevel {
    type Error = ParseRepresentativeLevelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "VILLAGE" => Ok(Self::Village),
            "TALUKA" => Ok(Self::Taluka),
            "DISTRICT" => Ok(Self::District),
            "STATE" => Ok(Self::State),
            _ => Err(ParseRepresentativeLevelError(value.to_owned())),
        }
    }
}

/// An account known to the directory.
///
/// A user is a representative exactly when it carries a
/// [`RepresentativeLevel`]; citizens carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    representative_level: Option<RepresentativeLevel>,
    jurisdiction: Jurisdiction,
}

/// Parameter object for reconstructing a persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted account identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: String,
    /// Persisted representative level, if the account is a representative.
    pub representative_level: Option<RepresentativeLevel>,
    /// Persisted jurisdiction.
    pub jurisdiction: Jurisdiction,
}

impl User {
    /// Creates a citizen account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError`] when the username is empty or too
    /// long.
    pub fn citizen(
        username: impl Into<String>,
        jurisdiction: Jurisdiction,
    ) -> Result<Self, DirectoryDomainError> {
        Self::build(username.into(), None, jurisdiction)
    }

    /// Creates a representative account at the given tier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError`] when the username is empty or too
    /// long.
    pub fn representative(
        username: impl Into<String>,
        level: RepresentativeLevel,
        jurisdiction: Jurisdiction,
    ) -> Result<Self, DirectoryDomainError> {
        Self::build(username.into(), Some(level), jurisdiction)
    }

    /// Reconstructs an account from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            representative_level: data.representative_level,
            jurisdiction: data.jurisdiction,
        }
    }

    fn build(
        raw_username: String,
        representative_level: Option<RepresentativeLevel>,
        jurisdiction: Jurisdiction,
    ) -> Result<Self, DirectoryDomainError> {
        let username = raw_username.trim();
        if username.is_empty() {
            return Err(DirectoryDomainError::EmptyUsername);
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(DirectoryDomainError::UsernameTooLong(raw_username));
        }

        Ok(Self {
            id: UserId::new(),
            username: username.to_owned(),
            representative_level,
            jurisdiction,
        })
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the representative tier, or `None` for citizens.
    #[must_use]
    pub const fn representative_level(&self) -> Option<RepresentativeLevel> {
        self.representative_level
    }

    /// Returns `true` when the account may act as a representative.
    #[must_use]
    pub const fn is_representative(&self) -> bool {
        self.representative_level.is_some()
    }

    /// Returns the account jurisdiction.
    #[must_use]
    pub const fn jurisdiction(&self) -> &Jurisdiction {
        &self.jurisdiction
    }
}
