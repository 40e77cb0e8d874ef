//! Diesel schema for notification persistence.

diesel::table! {
    /// Append-only delivery records.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Receiving user.
        recipient_id -> Uuid,
        /// Referenced issue.
        issue_id -> Nullable<Uuid>,
        /// Rendered text.
        #[max_length = 255]
        text -> Varchar,
        /// Notification category.
        #[max_length = 20]
        kind -> Varchar,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
