//! Repository port for issue persistence, optimistic updates, and
//! escalation candidate queries.

use crate::issue::domain::{EscalationCandidateQuery, Issue, IssueId, IssueVersion};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Issue persistence contract.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a newly reported issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when the identifier
    /// already exists.
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()>;

    /// Replaces a stored issue if its stored version still equals
    /// `expected_version`.
    ///
    /// The check and the write are a single atomic step, so of two writers
    /// that loaded the same version exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] when the issue does not
    /// exist or [`IssueRepositoryError::ConcurrentModification`] when the
    /// stored version differs.
    async fn update(&self, issue: &Issue, expected_version: IssueVersion)
    -> IssueRepositoryResult<()>;

    /// Finds an issue by identifier.
    ///
    /// Returns `None` when the issue does not exist.
    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>>;

    /// Returns every issue matching an escalation candidate query.
    ///
    /// No ordering is guaranteed.
    async fn find_escalation_candidates(
        &self,
        query: &EscalationCandidateQuery,
    ) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns issues whose taluka matches case-insensitively, newest first.
    async fn find_by_taluka(&self, taluka: &str) -> IssueRepositoryResult<Vec<Issue>>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// The stored version no longer matches the version the caller loaded.
    #[error("issue {issue_id} was modified concurrently (expected {expected})")]
    ConcurrentModification {
        /// Conflicting issue.
        issue_id: IssueId,
        /// Version the caller loaded.
        expected: IssueVersion,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted issue data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps persisted-data decoding failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
