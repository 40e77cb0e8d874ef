//! Domain model for civic issues.
//!
//! The issue aggregate enforces the escalation invariants: the level only
//! moves one tier up at a time, never past the State tier, and resolved
//! issues are never escalated.

mod candidate;
mod error;
mod ids;
mod issue;
mod level;
mod status;

pub use candidate::EscalationCandidateQuery;
pub use error::{
    IssueDomainError, ParseEscalationLevelError, ParseIssuePriorityError, ParseIssueStatusError,
};
pub use ids::{IssueId, IssueVersion};
pub use issue::{Issue, IssueDraft, PersistedIssueData};
pub use level::EscalationLevel;
pub use status::{IssuePriority, IssueStatus};
