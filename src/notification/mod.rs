//! Notification records for citizens and representatives.
//!
//! Notifications are append-only delivery records; only their read flag
//! changes after creation. The dispatcher service renders notification
//! texts, persists records, and serves each recipient's inbox. The module
//! follows the crate's hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Dispatch services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
