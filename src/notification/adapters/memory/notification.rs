//! In-memory notification store for tests and local runs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::directory::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};

/// Thread-safe in-memory notification store.
///
/// Records are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored notification in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn snapshot(&self) -> NotificationRepositoryResult<Vec<Notification>> {
        let notifications = self.notifications.read().map_err(|err| lock_error(&err))?;
        Ok(notifications.clone())
    }
}

fn lock_error(err: &impl std::fmt::Display) -> NotificationRepositoryError {
    NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut notifications = self.notifications.write().map_err(|err| lock_error(&err))?;
        if notifications
            .iter()
            .any(|existing| existing.id() == notification.id())
        {
            return Err(NotificationRepositoryError::DuplicateNotification(
                notification.id(),
            ));
        }
        notifications.push(notification.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let notifications = self.notifications.read().map_err(|err| lock_error(&err))?;
        Ok(notifications
            .iter()
            .find(|notification| notification.id() == id)
            .cloned())
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let notifications = self.notifications.read().map_err(|err| lock_error(&err))?;
        let mut listed: Vec<Notification> = notifications
            .iter()
            .rev()
            .filter(|notification| notification.recipient() == recipient)
            .cloned()
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        listed.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(listed)
    }

    async fn mark_read(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> NotificationRepositoryResult<()> {
        let mut notifications = self.notifications.write().map_err(|err| lock_error(&err))?;
        let notification = notifications
            .iter_mut()
            .find(|notification| notification.id() == id && notification.recipient() == recipient)
            .ok_or(NotificationRepositoryError::NotFound(id))?;
        notification.mark_read();
        Ok(())
    }

    async fn mark_all_read(&self, recipient: UserId) -> NotificationRepositoryResult<u64> {
        let mut notifications = self.notifications.write().map_err(|err| lock_error(&err))?;
        let mut changed: u64 = 0;
        for notification in notifications
            .iter_mut()
            .filter(|notification| notification.recipient() == recipient && !notification.is_read())
        {
            notification.mark_read();
            changed += 1;
        }
        Ok(changed)
    }
}
