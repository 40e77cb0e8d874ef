//! Port contracts for issue persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by issue and
//! escalation services.

pub mod repository;

pub use repository::{IssueRepository, IssueRepositoryError, IssueRepositoryResult};
