//! Escalation requests.

use crate::directory::domain::UserId;
use crate::issue::domain::EscalationLevel;
use chrono::{DateTime, Utc};

/// One escalation attempt on one issue.
///
/// The two variants deliberately behave differently. A scheduled
/// escalation consults the directory, reassigns the issue, marks it
/// `ESCALATED`, and notifies both the new assignee and the reporter. A
/// manual escalation only raises the level and notifies the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationRequest {
    /// Time-driven escalation issued by the scheduler.
    Scheduled {
        /// Tier to escalate to; must be exactly one above the current tier.
        target: EscalationLevel,
        /// Instant recorded as `last_escalated_at`.
        at: DateTime<Utc>,
    },
    /// Escalation requested by a representative.
    Manual {
        /// Acting user; must be a representative.
        actor: UserId,
    },
}

impl EscalationRequest {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Scheduled { .. } => "scheduled",
            Self::Manual { .. } => "manual",
        }
    }
}
