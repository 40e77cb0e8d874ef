//! Notification categories.

use super::ParseNotificationKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event category that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A comment was posted on an issue.
    Comment,
    /// An issue status changed.
    Status,
    /// An issue was escalated.
    Escalation,
    /// A new issue was reported in the recipient's jurisdiction.
    NewIssue,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "COMMENT",
            Self::Status => "STATUS",
            Self::Escalation => "ESCALATION",
            Self::NewIssue => "NEW_ISSUE",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = ParseNotificationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "COMMENT" => Ok(Self::Comment),
            "STATUS" => Ok(Self::Status),
            "ESCALATION" => Ok(Self::Escalation),
            "NEW_ISSUE" => Ok(Self::NewIssue),
            _ => Err(ParseNotificationKindError(value.to_owned())),
        }
    }
}
