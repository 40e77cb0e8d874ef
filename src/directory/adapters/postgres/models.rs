//! Diesel row models for account persistence.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for account records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Account identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Unique login name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub username: String,
    /// Representative tier, if any.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub representative_level: Option<String>,
    /// Jurisdiction state.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub state: Option<String>,
    /// Jurisdiction district.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub district: Option<String>,
    /// Jurisdiction taluka.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub taluka: Option<String>,
}

/// Insert model for account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Unique login name.
    pub username: String,
    /// Representative tier, if any.
    pub representative_level: Option<String>,
    /// Jurisdiction state.
    pub state: Option<String>,
    /// Jurisdiction district.
    pub district: Option<String>,
    /// Jurisdiction taluka.
    pub taluka: Option<String>,
}
