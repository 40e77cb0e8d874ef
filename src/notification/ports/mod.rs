//! Port contracts for notification persistence.

pub mod repository;

#[cfg(test)]
pub use repository::MockNotificationRepository;
pub use repository::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult};
