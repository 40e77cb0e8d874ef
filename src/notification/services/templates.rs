//! Notification texts rendered from `minijinja` templates.

use crate::issue::domain::{EscalationLevel, IssueId, IssueStatus};
use crate::notification::domain::NotificationKind;
use minijinja::{Environment, Value, context};

/// Number of comment characters quoted in comment notifications.
pub const COMMENT_EXCERPT_LENGTH: usize = 50;

/// A notification event together with the values its text needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationMessage {
    /// Scheduled escalation, addressed to the new assignee.
    EscalatedToAssignee {
        /// Escalated issue.
        issue_id: IssueId,
    },
    /// Scheduled escalation, addressed to the reporter.
    EscalatedToReporter {
        /// Escalated issue.
        issue_id: IssueId,
        /// Level reached.
        level: EscalationLevel,
    },
    /// Representative-initiated escalation, addressed to the reporter.
    ManuallyEscalated {
        /// Issue title.
        title: String,
        /// Level reached.
        level: EscalationLevel,
    },
    /// A new issue was reported in a representative's taluka.
    NewIssue {
        /// Issue taluka.
        taluka: String,
        /// Issue title.
        title: String,
    },
    /// A representative changed the issue status.
    StatusChanged {
        /// Issue title.
        title: String,
        /// New status.
        status: IssueStatus,
    },
    /// A representative commented; addressed to the reporter.
    RepresentativeComment {
        /// Issue title.
        title: String,
        /// Leading characters of the comment.
        excerpt: String,
    },
    /// A citizen commented; addressed to taluka representatives.
    CitizenComment {
        /// Issue title.
        title: String,
        /// Leading characters of the comment.
        excerpt: String,
    },
}

impl NotificationMessage {
    /// Builds a representative comment message, quoting the first
    /// [`COMMENT_EXCERPT_LENGTH`] characters of `comment`.
    #[must_use]
    pub fn representative_comment(title: impl Into<String>, comment: &str) -> Self {
        Self::RepresentativeComment {
            title: title.into(),
            excerpt: excerpt(comment),
        }
    }

    /// Builds a citizen comment message, quoting the first
    /// [`COMMENT_EXCERPT_LENGTH`] characters of `comment`.
    #[must_use]
    pub fn citizen_comment(title: impl Into<String>, comment: &str) -> Self {
        Self::CitizenComment {
            title: title.into(),
            excerpt: excerpt(comment),
        }
    }

    /// Returns the notification kind recorded for this message.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::EscalatedToAssignee { .. }
            | Self::EscalatedToReporter { .. }
            | Self::ManuallyEscalated { .. } => NotificationKind::Escalation,
            Self::NewIssue { .. } => NotificationKind::NewIssue,
            Self::StatusChanged { .. } => NotificationKind::Status,
            Self::RepresentativeComment { .. } | Self::CitizenComment { .. } => {
                NotificationKind::Comment
            }
        }
    }

    /// Returns the template source for this message.
    #[must_use]
    pub const fn template(&self) -> &'static str {
        match self {
            Self::EscalatedToAssignee { .. } => "Issue #{{ issue_id }} has been escalated to you.",
            Self::EscalatedToReporter { .. } => {
                "Your issue #{{ issue_id }} has been escalated to Level {{ level }}."
            }
            Self::ManuallyEscalated { .. } => {
                "Your issue '{{ title }}' has been escalated to level {{ level }}"
            }
            Self::NewIssue { .. } => "New issue reported in {{ taluka }}: {{ title }}",
            Self::StatusChanged { .. } => "Status updated for your issue '{{ title }}': {{ status }}",
            Self::RepresentativeComment { .. } => {
                "Representative commented on '{{ title }}': {{ excerpt }}..."
            }
            Self::CitizenComment { .. } => "New comment on '{{ title }}': {{ excerpt }}...",
        }
    }

    fn context(&self) -> Value {
        match self {
            Self::EscalatedToAssignee { issue_id } => context! {
                issue_id => issue_id.to_string(),
            },
            Self::EscalatedToReporter { issue_id, level } => context! {
                issue_id => issue_id.to_string(),
                level => level.value(),
            },
            Self::ManuallyEscalated { title, level } => context! {
                title => title,
                level => level.value(),
            },
            Self::NewIssue { taluka, title } => context! {
                taluka => taluka,
                title => title,
            },
            Self::StatusChanged { title, status } => context! {
                title => title,
                status => status.as_str(),
            },
            Self::RepresentativeComment { title, excerpt }
            | Self::CitizenComment { title, excerpt } => context! {
                title => title,
                excerpt => excerpt,
            },
        }
    }

    /// Renders the notification text.
    ///
    /// # Errors
    ///
    /// Returns the `minijinja` error when rendering fails.
    pub fn render(&self) -> Result<String, minijinja::Error> {
        let environment = Environment::new();
        environment.render_str(self.template(), self.context())
    }
}

fn excerpt(comment: &str) -> String {
    comment.chars().take(COMMENT_EXCERPT_LENGTH).collect()
}
