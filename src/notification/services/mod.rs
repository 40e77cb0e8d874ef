//! Application services for notification dispatch and inbox management.

mod dispatcher;
mod templates;

pub use dispatcher::{NotificationDispatchError, NotificationDispatchResult, NotificationDispatcher};
pub use templates::{COMMENT_EXCERPT_LENGTH, NotificationMessage};
