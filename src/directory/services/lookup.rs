//! Resolves the representative responsible for an issue's jurisdiction.

use crate::directory::{
    domain::{Jurisdiction, RepresentativeLevel, RepresentativeQuery, User, UserId},
    ports::{UserDirectory, UserDirectoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for directory lookups.
#[derive(Debug, Error)]
pub enum DirectoryLookupError {
    /// No account exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserDirectoryError),
}

/// Result type for directory lookups.
pub type DirectoryLookupResult<T> = Result<T, DirectoryLookupError>;

/// Directory lookup service.
///
/// When several representatives share a jurisdiction the one with the
/// lowest [`UserId`] is chosen, independent of the order the adapter
/// returns them in.
#[derive(Clone)]
pub struct DirectoryLookup<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
}

impl<D> DirectoryLookup<D>
where
    D: UserDirectory,
{
    /// Creates a new lookup service.
    #[must_use]
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Resolves an account that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryLookupError::UserNotFound`] when the identifier does
    /// not resolve, or repository errors.
    pub async fn require_user(&self, id: UserId) -> DirectoryLookupResult<User> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(DirectoryLookupError::UserNotFound(id))
    }

    /// Finds the representative responsible for `jurisdiction` at `level`.
    ///
    /// District lookups require matching district and state; state lookups
    /// require a matching state. Village and taluka tiers are never
    /// escalation targets, so they always resolve to `None`. A missing
    /// location field on the jurisdiction also resolves to `None`.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the directory.
    pub async fn find_responsible_rep(
        &self,
        level: RepresentativeLevel,
        jurisdiction: &Jurisdiction,
    ) -> DirectoryLookupResult<Option<User>> {
        let Some(query) = responsible_rep_query(level, jurisdiction) else {
            debug!(%level, "no routable jurisdiction for representative lookup");
            return Ok(None);
        };

        let candidates = self.directory.find_representatives(&query).await?;
        let chosen = candidates.into_iter().min_by_key(User::id);
        if chosen.is_none() {
            debug!(%level, "no representative found for jurisdiction");
        }
        Ok(chosen)
    }

    /// Returns every representative whose taluka matches `jurisdiction`,
    /// ordered by ascending identifier.
    ///
    /// Representatives of any tier are included. A jurisdiction without a
    /// taluka yields no recipients.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the directory.
    pub async fn taluka_representatives(
        &self,
        jurisdiction: &Jurisdiction,
    ) -> DirectoryLookupResult<Vec<User>> {
        let Some(taluka) = jurisdiction.taluka() else {
            return Ok(Vec::new());
        };
        let query = RepresentativeQuery::any_level().in_taluka(taluka);
        let mut representatives = self.directory.find_representatives(&query).await?;
        representatives.sort_by_key(User::id);
        Ok(representatives)
    }
}

fn responsible_rep_query(
    level: RepresentativeLevel,
    jurisdiction: &Jurisdiction,
) -> Option<RepresentativeQuery> {
    match level {
        RepresentativeLevel::District => {
            let district = jurisdiction.district()?;
            let state = jurisdiction.state()?;
            Some(
                RepresentativeQuery::at_level(level)
                    .in_district(district)
                    .in_state(state),
            )
        }
        RepresentativeLevel::State => {
            let state = jurisdiction.state()?;
            Some(RepresentativeQuery::at_level(level).in_state(state))
        }
        RepresentativeLevel::Village | RepresentativeLevel::Taluka => None,
    }
}
