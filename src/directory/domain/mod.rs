//! Domain model for citizen and representative accounts.
//!
//! Account management itself happens elsewhere; this domain only carries the
//! identity, representative tier, and jurisdiction needed for routing.

mod error;
mod ids;
mod jurisdiction;
mod query;
mod user;

pub use error::{DirectoryDomainError, ParseRepresentativeLevelError};
pub use ids::UserId;
pub use jurisdiction::Jurisdiction;
pub use query::RepresentativeQuery;
pub use user::{PersistedUserData, RepresentativeLevel, User};
