//! Application services for representative lookup.

mod lookup;

pub use lookup::{DirectoryLookup, DirectoryLookupError, DirectoryLookupResult};
