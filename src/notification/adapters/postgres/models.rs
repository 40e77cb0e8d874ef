//! Diesel row models for notification persistence.

use super::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for notification records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Receiving user.
    pub recipient_id: uuid::Uuid,
    /// Referenced issue.
    pub issue_id: Option<uuid::Uuid>,
    /// Rendered text.
    pub text: String,
    /// Notification category.
    pub kind: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Receiving user.
    pub recipient_id: uuid::Uuid,
    /// Referenced issue.
    pub issue_id: Option<uuid::Uuid>,
    /// Rendered text.
    pub text: String,
    /// Notification category.
    pub kind: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
