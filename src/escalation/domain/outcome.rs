//! Escalation and sweep results.

use crate::directory::domain::UserId;
use crate::issue::domain::{EscalationLevel, Issue};
use crate::notification::domain::Notification;

/// Result of an applied escalation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationOutcome {
    /// Issue as persisted after the escalation.
    pub issue: Issue,
    /// Level before the escalation.
    pub previous_level: EscalationLevel,
    /// Representative the issue was reassigned to, if one was found.
    pub assignee: Option<UserId>,
    /// Notifications recorded after the issue was persisted.
    pub notifications: Vec<Notification>,
}

/// Counters summarising one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Issues moved from the Taluka to the District tier.
    pub taluka_escalated: usize,
    /// Issues moved from the District to the State tier.
    pub district_escalated: usize,
    /// Candidates left alone after a concurrent change.
    pub skipped: usize,
    /// Candidates whose escalation failed.
    pub failed: usize,
    /// Candidate queries that failed, leaving their tier unexamined.
    pub failed_queries: usize,
}

impl SweepReport {
    /// Returns the number of issues escalated in this sweep.
    #[must_use]
    pub const fn total_escalated(&self) -> usize {
        self.taluka_escalated + self.district_escalated
    }

    pub(crate) const fn record_escalation(&mut self, target: EscalationLevel) {
        match target {
            EscalationLevel::District => self.taluka_escalated += 1,
            EscalationLevel::State => self.district_escalated += 1,
            EscalationLevel::Taluka => {}
        }
    }
}
