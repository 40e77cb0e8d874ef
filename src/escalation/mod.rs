//! Escalation engine for stalled civic issues.
//!
//! The state machine applies one escalation to one issue: the scheduled
//! variant reassigns the issue to the representative of the next tier,
//! while the manual variant, triggered by a representative, only moves the
//! level. The scheduler sweeps for issues past their tier's threshold and
//! feeds each to the state machine as an independent unit of work.
//!
//! - Domain types in [`domain`]
//! - Engine services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
