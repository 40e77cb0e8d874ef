//! `PostgreSQL` adapter for the representative directory.

mod models;
mod repository;
mod schema;

pub use repository::{DirectoryPgPool, PostgresUserDirectory};
