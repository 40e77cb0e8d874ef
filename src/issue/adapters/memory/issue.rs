//! In-memory issue repository for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::Jurisdiction;
use crate::issue::{
    domain::{EscalationCandidateQuery, Issue, IssueId, IssueVersion},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};

/// Thread-safe in-memory issue repository.
///
/// The version check and write in [`IssueRepository::update`] happen under
/// one write lock, which gives the same compare-and-swap semantics as the
/// `PostgreSQL` adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    issues: Arc<RwLock<HashMap<IssueId, Issue>>>,
}

impl InMemoryIssueRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: &impl std::fmt::Display) -> IssueRepositoryError {
    IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let mut issues = self.issues.write().map_err(|err| lock_error(&err))?;
        if issues.contains_key(&issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id()));
        }
        issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn update(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
    ) -> IssueRepositoryResult<()> {
        let mut issues = self.issues.write().map_err(|err| lock_error(&err))?;
        let stored = issues
            .get_mut(&issue.id())
            .ok_or(IssueRepositoryError::NotFound(issue.id()))?;
        if stored.version() != expected_version {
            return Err(IssueRepositoryError::ConcurrentModification {
                issue_id: issue.id(),
                expected: expected_version,
            });
        }
        *stored = issue.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        let issues = self.issues.read().map_err(|err| lock_error(&err))?;
        Ok(issues.get(&id).cloned())
    }

    async fn find_escalation_candidates(
        &self,
        query: &EscalationCandidateQuery,
    ) -> IssueRepositoryResult<Vec<Issue>> {
        let issues = self.issues.read().map_err(|err| lock_error(&err))?;
        Ok(issues
            .values()
            .filter(|issue| query.matches(issue))
            .cloned()
            .collect())
    }

    async fn find_by_taluka(&self, taluka: &str) -> IssueRepositoryResult<Vec<Issue>> {
        let wanted = Jurisdiction::new().with_taluka(taluka);
        let issues = self.issues.read().map_err(|err| lock_error(&err))?;
        let mut matching: Vec<Issue> = issues
            .values()
            .filter(|issue| issue.jurisdiction().shares_taluka(&wanted))
            .cloned()
            .collect();
        matching.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(matching)
    }
}
