//! Notification record.

use super::{NotificationDomainError, NotificationId, NotificationKind};
use crate::directory::domain::UserId;
use crate::issue::domain::IssueId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum text length, matching the `VARCHAR(255)` column.
const MAX_TEXT_LENGTH: usize = 255;

/// A delivery record addressed to one recipient.
///
/// Immutable once created except for the read flag, which only moves from
/// unread to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    recipient: UserId,
    issue: Option<IssueId>,
    text: String,
    kind: NotificationKind,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted identifier.
    pub id: NotificationId,
    /// Persisted recipient.
    pub recipient: UserId,
    /// Persisted issue reference.
    pub issue: Option<IssueId>,
    /// Persisted text.
    pub text: String,
    /// Persisted kind.
    pub kind: NotificationKind,
    /// Persisted read flag.
    pub is_read: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification.
    ///
    /// Text longer than 255 characters is truncated on a character boundary.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDomainError::EmptyText`] when the text is blank.
    pub fn new(
        recipient: UserId,
        issue: Option<IssueId>,
        text: impl Into<String>,
        kind: NotificationKind,
        clock: &impl Clock,
    ) -> Result<Self, NotificationDomainError> {
        let raw_text = text.into();
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(NotificationDomainError::EmptyText);
        }

        Ok(Self {
            id: NotificationId::new(),
            recipient,
            issue,
            text: trimmed.chars().take(MAX_TEXT_LENGTH).collect(),
            kind,
            is_read: false,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            recipient: data.recipient,
            issue: data.issue,
            text: data.text,
            kind: data.kind,
            is_read: data.is_read,
            created_at: data.created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the referenced issue, if any.
    #[must_use]
    pub const fn issue(&self) -> Option<IssueId> {
        self.issue
    }

    /// Returns the text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns `true` once the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the notification as read. Already-read notifications stay read.
    pub const fn mark_read(&mut self) {
        self.is_read = true;
    }
}
