//! Error types for notification domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationDomainError {
    /// The notification text is empty after trimming.
    #[error("notification text must not be empty")]
    EmptyText,
}

/// Error returned while parsing notification kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification kind: {0}")]
pub struct ParseNotificationKindError(pub String);
