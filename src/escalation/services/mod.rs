//! Escalation engine services.

mod error;
mod scheduler;
mod state_machine;

pub use error::{EscalationError, EscalationResult};
pub use scheduler::EscalationScheduler;
pub use state_machine::EscalationStateMachine;
