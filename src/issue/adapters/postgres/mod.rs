//! `PostgreSQL` adapter for issue persistence.

mod models;
mod repository;
mod schema;

pub use repository::{IssuePgPool, PostgresIssueRepository};
