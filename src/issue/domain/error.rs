//! Error types for issue domain validation and parsing.

use super::{EscalationLevel, IssueId, IssueStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating issues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueDomainError {
    /// The issue title is empty after trimming.
    #[error("issue title must not be empty")]
    EmptyTitle,

    /// The issue title exceeds the 200-character storage limit.
    #[error("issue title exceeds 200 character limit")]
    TitleTooLong,

    /// A free-text or location field exceeds its storage limit.
    #[error("issue {field} exceeds {max} character limit")]
    FieldTooLong {
        /// Offending field.
        field: &'static str,
        /// Character limit.
        max: usize,
    },

    /// The requested escalation target is not exactly one tier above the
    /// current level.
    #[error("issue {issue_id} cannot escalate from {from} to {to}")]
    InvalidTransition {
        /// Issue being escalated.
        issue_id: IssueId,
        /// Current escalation level.
        from: EscalationLevel,
        /// Requested escalation level.
        to: EscalationLevel,
    },

    /// The issue already sits at the State tier.
    #[error("issue {0} is already at the final escalation level")]
    FinalLevelReached(IssueId),

    /// The issue is resolved and can no longer be escalated.
    #[error("issue {0} is resolved and cannot be escalated")]
    ResolvedIssue(IssueId),

    /// The status may only be set by the escalation engine.
    #[error("status {0} is reserved for the escalation engine")]
    ReservedStatus(IssueStatus),
}

impl IssueDomainError {
    /// Returns `true` for errors that reject an escalation attempt.
    #[must_use]
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::FinalLevelReached(_) | Self::ResolvedIssue(_)
        )
    }
}

/// Error returned while parsing issue statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue status: {0}")]
pub struct ParseIssueStatusError(pub String);

/// Error returned while parsing issue priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue priority: {0}")]
pub struct ParseIssuePriorityError(pub String);

/// Error returned for escalation levels outside `0..=2`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("escalation level {0} is outside 0..=2")]
pub struct ParseEscalationLevelError(pub i64);
