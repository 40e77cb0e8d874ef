//! Error types for directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username exceeds the 150-character storage limit.
    #[error("username exceeds 150 character limit: {0}")]
    UsernameTooLong(String),
}

/// Error returned while parsing a representative level from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown representative level: {0}")]
pub struct ParseRepresentativeLevelError(pub String);
