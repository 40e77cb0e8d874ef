//! Notification dispatch and recipient inbox service.

use super::NotificationMessage;
use crate::directory::domain::UserId;
use crate::issue::domain::IssueId;
use crate::notification::{
    domain::{Notification, NotificationDomainError, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for notification dispatch.
#[derive(Debug, Error)]
pub enum NotificationDispatchError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] NotificationDomainError),
    /// The notification text could not be rendered.
    #[error("failed to render notification text: {0}")]
    Template(String),
    /// The notification does not exist for this recipient.
    #[error("notification {0} not found")]
    NotFound(NotificationId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(NotificationRepositoryError),
}

impl From<NotificationRepositoryError> for NotificationDispatchError {
    fn from(err: NotificationRepositoryError) -> Self {
        match err {
            NotificationRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for notification dispatch operations.
pub type NotificationDispatchResult<T> = Result<T, NotificationDispatchError>;

/// Creates notification records and serves recipient inboxes.
///
/// No deduplication is performed: each call appends a new record.
#[derive(Clone)]
pub struct NotificationDispatcher<N, C>
where
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<N>,
    clock: Arc<C>,
}

impl<N, C> NotificationDispatcher<N, C>
where
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dispatcher.
    #[must_use]
    pub const fn new(repository: Arc<N>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Renders `message` and appends one notification for `recipient`.
    ///
    /// The caller guarantees that `recipient` identifies an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDispatchError::Template`] when rendering fails,
    /// domain errors for an empty text, or repository errors.
    pub async fn notify(
        &self,
        recipient: UserId,
        issue: Option<IssueId>,
        message: &NotificationMessage,
    ) -> NotificationDispatchResult<Notification> {
        let text = message
            .render()
            .map_err(|err| NotificationDispatchError::Template(err.to_string()))?;
        let notification =
            Notification::new(recipient, issue, text, message.kind(), &*self.clock)?;
        self.repository.append(&notification).await?;
        debug!(
            notification_id = %notification.id(),
            recipient = %recipient,
            kind = %notification.kind(),
            "notification recorded"
        );
        Ok(notification)
    }

    /// Dispatches a notification, logging rather than returning failures.
    ///
    /// Used once the triggering issue mutation is committed, so a delivery
    /// failure never undoes it.
    pub async fn notify_best_effort(
        &self,
        recipient: UserId,
        issue: Option<IssueId>,
        message: &NotificationMessage,
    ) -> Option<Notification> {
        match self.notify(recipient, issue, message).await {
            Ok(notification) => Some(notification),
            Err(err) => {
                warn!(
                    recipient = %recipient,
                    issue_id = ?issue,
                    kind = %message.kind(),
                    error = %err,
                    "notification dispatch failed"
                );
                None
            }
        }
    }

    /// Dispatches the same message to every recipient, best effort.
    ///
    /// Returns the notifications that were recorded; zero recipients yield
    /// zero notifications.
    pub async fn notify_all(
        &self,
        recipients: &[UserId],
        issue: Option<IssueId>,
        message: &NotificationMessage,
    ) -> Vec<Notification> {
        let mut delivered = Vec::new();
        for recipient in recipients {
            if let Some(notification) = self.notify_best_effort(*recipient, issue, message).await {
                delivered.push(notification);
            }
        }
        delivered
    }

    /// Lists a recipient's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn inbox(&self, recipient: UserId) -> NotificationDispatchResult<Vec<Notification>> {
        Ok(self.repository.list_for_recipient(recipient).await?)
    }

    /// Marks one of the recipient's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDispatchError::NotFound`] when the notification
    /// does not exist or belongs to someone else.
    pub async fn mark_read(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> NotificationDispatchResult<()> {
        Ok(self.repository.mark_read(recipient, id).await?)
    }

    /// Marks all of the recipient's unread notifications as read.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn mark_all_read(&self, recipient: UserId) -> NotificationDispatchResult<u64> {
        Ok(self.repository.mark_all_read(recipient).await?)
    }
}
