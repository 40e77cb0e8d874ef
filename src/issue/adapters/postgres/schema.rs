//! Diesel schema for issue persistence.

diesel::table! {
    /// Citizen-reported issues.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// Short summary.
        #[max_length = 200]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Free-text location.
        #[max_length = 255]
        location -> Varchar,
        /// Routing state.
        #[max_length = 100]
        state -> Nullable<Varchar>,
        /// Routing district.
        #[max_length = 100]
        district -> Nullable<Varchar>,
        /// Routing taluka.
        #[max_length = 100]
        taluka -> Nullable<Varchar>,
        /// Postal code.
        #[max_length = 10]
        pincode -> Nullable<Varchar>,
        /// Workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Citizen-assigned priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Escalation tier ordinal.
        escalation_level -> Int2,
        /// Timestamp of the last scheduled escalation.
        last_escalated_at -> Nullable<Timestamptz>,
        /// Reporting citizen.
        reported_by -> Uuid,
        /// Current assignee.
        assigned_to -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency token.
        version -> Int8,
    }
}
