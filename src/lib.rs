//! Civic escalation: routing of citizen-reported issues through the Taluka,
//! District, and State tiers.
//!
//! Citizens report issues against a jurisdiction. Representatives of that
//! jurisdiction manage them, and issues left waiting too long are escalated
//! to the next administrative tier by a periodic sweep. Every state change
//! is recorded as notifications for the affected users.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration over ports with an injected clock
//!
//! # Modules
//!
//! - [`directory`]: Users, representatives, and jurisdiction lookup
//! - [`issue`]: The issue aggregate and request-driven lifecycle
//! - [`notification`]: Notification records and dispatch
//! - [`escalation`]: The escalation state machine and scheduler
//! - [`settings`]: Sweeper configuration

pub mod directory;
pub mod escalation;
pub mod issue;
pub mod notification;
pub mod settings;

#[cfg(test)]
mod test_support;
