//! Representative directory for Civic Connect.
//!
//! Holds citizen and representative accounts together with the jurisdiction
//! fields (state, district, taluka) used to route issues. The escalation
//! engine consults this directory to find the representative responsible
//! for an issue at a given administrative tier. The module follows the
//! crate's hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Lookup services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
