//! Repository port for append-only notification storage.

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Notification persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Appends a new notification record.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::DuplicateNotification`] when the
    /// identifier already exists.
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Finds a notification by identifier.
    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>>;

    /// Returns a recipient's notifications, newest first.
    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>>;

    /// Marks one notification owned by `recipient` as read.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::NotFound`] when the notification
    /// does not exist or belongs to another recipient.
    async fn mark_read(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> NotificationRepositoryResult<()>;

    /// Marks every unread notification of `recipient` as read and returns how
    /// many changed.
    async fn mark_all_read(&self, recipient: UserId) -> NotificationRepositoryResult<u64>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// A notification with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    DuplicateNotification(NotificationId),

    /// The notification was not found for the recipient.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted notification data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps persisted-data decoding failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
