//! Errors surfaced by the escalation engine.

use crate::directory::{domain::UserId, services::DirectoryLookupError};
use crate::issue::{
    domain::{IssueDomainError, IssueId},
    ports::IssueRepositoryError,
};
use thiserror::Error;

/// Service-level errors for escalation.
///
/// Every variant is raised before the issue write, or by the write itself,
/// so an error always means the issue was left unchanged.
#[derive(Debug, Error)]
pub enum EscalationError {
    /// The issue does not exist.
    #[error("issue {0} not found")]
    IssueNotFound(IssueId),
    /// The acting user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// The acting user is not a representative.
    #[error("user {0} is not permitted to escalate issues")]
    PermissionDenied(UserId),
    /// The requested level change is not allowed.
    #[error(transparent)]
    InvalidTransition(#[from] IssueDomainError),
    /// Another writer changed the issue first.
    #[error("issue {0} was modified concurrently")]
    ConcurrentModification(IssueId),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(DirectoryLookupError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(IssueRepositoryError),
}

impl EscalationError {
    /// Returns `true` when the attempt lost an optimistic concurrency race.
    #[must_use]
    pub const fn is_concurrent_modification(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

impl From<IssueRepositoryError> for EscalationError {
    fn from(err: IssueRepositoryError) -> Self {
        match err {
            IssueRepositoryError::ConcurrentModification { issue_id, .. } => {
                Self::ConcurrentModification(issue_id)
            }
            IssueRepositoryError::NotFound(issue_id) => Self::IssueNotFound(issue_id),
            other => Self::Repository(other),
        }
    }
}

impl From<DirectoryLookupError> for EscalationError {
    fn from(err: DirectoryLookupError) -> Self {
        match err {
            DirectoryLookupError::UserNotFound(user_id) => Self::UserNotFound(user_id),
            other @ DirectoryLookupError::Repository(_) => Self::Directory(other),
        }
    }
}

/// Result type for escalation operations.
pub type EscalationResult<T> = Result<T, EscalationError>;
