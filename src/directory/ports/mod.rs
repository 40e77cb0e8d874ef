//! Port contracts for the representative directory.
//!
//! Ports define infrastructure-agnostic interfaces used by directory
//! services and by the escalation engine.

pub mod repository;

pub use repository::{UserDirectory, UserDirectoryError, UserDirectoryResult};
