//! Repository port for account storage and representative queries.

use crate::directory::domain::{RepresentativeQuery, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory repository operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Account persistence and lookup contract.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::DuplicateUser`] when the identifier or
    /// username is already taken.
    async fn register(&self, user: &User) -> UserDirectoryResult<()>;

    /// Finds an account by identifier.
    ///
    /// Returns `None` when the account does not exist.
    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>>;

    /// Returns every representative matching the query, ordered by
    /// ascending [`UserId`].
    async fn find_representatives(
        &self,
        query: &RepresentativeQuery,
    ) -> UserDirectoryResult<Vec<User>>;
}

/// Errors returned by directory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// An account with the same identifier or username already exists.
    #[error("duplicate user: {0}")]
    DuplicateUser(String),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted user data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps persisted-data decoding failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
