//! Citizen-reported civic issues.
//!
//! Issues are reported by citizens, managed by the representatives of their
//! jurisdiction, and promoted through the Taluka, District, and State tiers
//! by the escalation engine. This module owns the issue aggregate, its
//! repository port and adapters, and the request-driven lifecycle service
//! (reporting, status updates, comments). The module follows the crate's
//! hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
