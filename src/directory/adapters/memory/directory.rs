//! In-memory account directory for tests and local runs.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{RepresentativeQuery, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe in-memory account directory.
///
/// Accounts are kept in a `BTreeMap` so representative queries naturally
/// return ascending identifiers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: &impl std::fmt::Display) -> UserDirectoryError {
    UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn register(&self, user: &User) -> UserDirectoryResult<()> {
        let mut users = self.users.write().map_err(|err| lock_error(&err))?;
        let username_taken = users
            .values()
            .any(|existing| existing.username() == user.username());
        if users.contains_key(&user.id()) || username_taken {
            return Err(UserDirectoryError::DuplicateUser(user.username().to_owned()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let users = self.users.read().map_err(|err| lock_error(&err))?;
        Ok(users.get(&id).cloned())
    }

    async fn find_representatives(
        &self,
        query: &RepresentativeQuery,
    ) -> UserDirectoryResult<Vec<User>> {
        let users = self.users.read().map_err(|err| lock_error(&err))?;
        Ok(users
            .values()
            .filter(|user| query.matches(user))
            .cloned()
            .collect())
    }
}
