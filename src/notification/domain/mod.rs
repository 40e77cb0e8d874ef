//! Domain model for notification records.

mod error;
mod ids;
mod kind;
mod notification;

pub use error::{NotificationDomainError, ParseNotificationKindError};
pub use ids::NotificationId;
pub use kind::NotificationKind;
pub use notification::{Notification, PersistedNotificationData};
