//! Selection predicates for issues due for escalation.

use super::{EscalationLevel, Issue};
use chrono::{DateTime, Utc};

/// Predicate selecting stalled issues for one escalation step.
///
/// Both variants also require a status of `OPEN` or `IN_PROGRESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationCandidateQuery {
    /// Level 0 issues reported at or before `reported_before`.
    TalukaOverdue {
        /// Inclusive creation cutoff.
        reported_before: DateTime<Utc>,
    },
    /// Level 1 issues last escalated at or before `escalated_before`.
    DistrictOverdue {
        /// Inclusive escalation cutoff.
        escalated_before: DateTime<Utc>,
    },
}

impl EscalationCandidateQuery {
    /// Returns the level matched issues currently sit at.
    #[must_use]
    pub const fn current_level(&self) -> EscalationLevel {
        match self {
            Self::TalukaOverdue { .. } => EscalationLevel::Taluka,
            Self::DistrictOverdue { .. } => EscalationLevel::District,
        }
    }

    /// Returns the level matched issues escalate to.
    #[must_use]
    pub const fn target_level(&self) -> EscalationLevel {
        match self {
            Self::TalukaOverdue { .. } => EscalationLevel::District,
            Self::DistrictOverdue { .. } => EscalationLevel::State,
        }
    }

    /// Returns the inclusive timestamp cutoff.
    #[must_use]
    pub const fn cutoff(&self) -> DateTime<Utc> {
        match self {
            Self::TalukaOverdue { reported_before } => *reported_before,
            Self::DistrictOverdue { escalated_before } => *escalated_before,
        }
    }

    /// Evaluates the predicate against an issue.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if !issue.status().is_awaiting_action() || issue.escalation_level() != self.current_level()
        {
            return false;
        }
        match self {
            Self::TalukaOverdue { reported_before } => issue.created_at() <= *reported_before,
            Self::DistrictOverdue { escalated_before } => issue
                .last_escalated_at()
                .is_some_and(|escalated_at| escalated_at <= *escalated_before),
        }
    }
}
