//! Adapter implementations for notification persistence.

pub mod memory;
pub mod postgres;
