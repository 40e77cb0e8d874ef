//! Application services for request-driven issue handling.

mod lifecycle;

pub use lifecycle::{IssueLifecycleError, IssueLifecycleResult, IssueLifecycleService};
