//! In-memory issue adapter.

mod issue;

pub use issue::InMemoryIssueRepository;
