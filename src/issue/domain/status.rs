//! Issue status and priority.

use super::{ParseIssuePriorityError, ParseIssueStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    /// Reported and awaiting action.
    Open,
    /// A representative is working on the issue.
    InProgress,
    /// The issue has been resolved.
    Resolved,
    /// The escalation engine promoted the issue to a higher tier.
    Escalated,
}

impl IssueStatus {
    /// Statuses the scheduler considers stalled.
    pub const AWAITING_ACTION: [Self; 2] = [Self::Open, Self::InProgress];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Escalated => "ESCALATED",
        }
    }

    /// Returns `true` for statuses the scheduler may escalate.
    #[must_use]
    pub const fn is_awaiting_action(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = ParseIssueStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            "ESCALATED" => Ok(Self::Escalated),
            _ => Err(ParseIssueStatusError(value.to_owned())),
        }
    }
}

/// Citizen-assigned urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuePriority {
    /// Low urgency.
    #[default]
    Low,
    /// Medium urgency.
    Medium,
    /// High urgency.
    High,
    /// Critical urgency.
    Critical,
}

impl IssuePriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl TryFrom<&str> for IssuePriority {
    type Error = ParseIssuePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ParseIssuePriorityError(value.to_owned())),
        }
    }
}
