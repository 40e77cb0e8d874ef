//! Adapter implementations for the representative directory.

pub mod memory;
pub mod postgres;
