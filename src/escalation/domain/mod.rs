//! Domain model for escalation requests, policies, and sweep results.

mod outcome;
mod policy;
mod request;

pub use outcome::{EscalationOutcome, SweepReport};
pub use policy::EscalationPolicy;
pub use request::EscalationRequest;
