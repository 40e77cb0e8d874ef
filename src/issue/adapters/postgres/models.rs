//! Diesel row models for issue persistence.

use super::schema::issues;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for issue records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Issue identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Short summary.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Free-text description.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Free-text location.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub location: String,
    /// Routing state.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub state: Option<String>,
    /// Routing district.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub district: Option<String>,
    /// Routing taluka.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub taluka: Option<String>,
    /// Postal code.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub pincode: Option<String>,
    /// Workflow status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Citizen-assigned priority.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub priority: String,
    /// Escalation tier ordinal.
    #[diesel(sql_type = diesel::sql_types::Int2)]
    pub escalation_level: i16,
    /// Timestamp of the last scheduled escalation.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub last_escalated_at: Option<DateTime<Utc>>,
    /// Reporting citizen.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub reported_by: uuid::Uuid,
    /// Current assignee.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Uuid>)]
    pub assigned_to: Option<uuid::Uuid>,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token.
    #[diesel(sql_type = diesel::sql_types::Int8)]
    pub version: i64,
}

/// Insert and update model for issue records.
///
/// `None` values are written as `NULL` so that updates can clear columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(treat_none_as_null = true)]
pub struct IssueRecord {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// Short summary.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Routing state.
    pub state: Option<String>,
    /// Routing district.
    pub district: Option<String>,
    /// Routing taluka.
    pub taluka: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Citizen-assigned priority.
    pub priority: String,
    /// Escalation tier ordinal.
    pub escalation_level: i16,
    /// Timestamp of the last scheduled escalation.
    pub last_escalated_at: Option<DateTime<Utc>>,
    /// Reporting citizen.
    pub reported_by: uuid::Uuid,
    /// Current assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token.
    pub version: i64,
}
