//! Service layer for reporting issues, status updates, and comments.

use crate::directory::{
    domain::{User, UserId},
    ports::UserDirectory,
    services::{DirectoryLookup, DirectoryLookupError},
};
use crate::issue::{
    domain::{Issue, IssueDomainError, IssueDraft, IssueId, IssueStatus},
    ports::{IssueRepository, IssueRepositoryError},
};
use crate::notification::{
    domain::Notification,
    ports::NotificationRepository,
    services::{NotificationDispatcher, NotificationMessage},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for issue lifecycle operations.
#[derive(Debug, Error)]
pub enum IssueLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),
    /// The issue does not exist.
    #[error("issue {0} not found")]
    IssueNotFound(IssueId),
    /// The actor is not allowed to perform the operation.
    #[error("user {0} is not a representative")]
    PermissionDenied(UserId),
    /// The comment body is blank.
    #[error("comment must not be empty")]
    EmptyComment,
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryLookupError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IssueRepositoryError),
}

/// Result type for issue lifecycle operations.
pub type IssueLifecycleResult<T> = Result<T, IssueLifecycleError>;

/// Issue lifecycle orchestration service.
///
/// Notifications are dispatched only after the issue write succeeds and
/// never fail the operation.
#[derive(Clone)]
pub struct IssueLifecycleService<R, D, N, C>
where
    R: IssueRepository,
    D: UserDirectory,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    issues: Arc<R>,
    directory: DirectoryLookup<D>,
    dispatcher: NotificationDispatcher<N, C>,
    clock: Arc<C>,
}

impl<R, D, N, C> IssueLifecycleService<R, D, N, C>
where
    R: IssueRepository,
    D: UserDirectory,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new issue lifecycle service.
    #[must_use]
    pub fn new(issues: Arc<R>, directory: Arc<D>, notifications: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            issues,
            directory: DirectoryLookup::new(directory),
            dispatcher: NotificationDispatcher::new(notifications, Arc::clone(&clock)),
            clock,
        }
    }

    /// Records a new issue and notifies every representative of its taluka.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError`] when the reporter is unknown, the draft
    /// is invalid, or the repository rejects the write.
    pub async fn report_issue(
        &self,
        reporter: UserId,
        draft: IssueDraft,
    ) -> IssueLifecycleResult<Issue> {
        self.directory.require_user(reporter).await?;
        let issue = Issue::report(draft, reporter, &*self.clock)?;
        self.issues.store(&issue).await?;
        info!(issue_id = %issue.id(), reporter = %reporter, "issue reported");

        if let Some(taluka) = issue.jurisdiction().taluka() {
            let recipients = self.taluka_recipients(&issue).await;
            let message = NotificationMessage::NewIssue {
                taluka: taluka.to_owned(),
                title: issue.title().to_owned(),
            };
            self.dispatcher
                .notify_all(&recipients, Some(issue.id()), &message)
                .await;
        }
        Ok(issue)
    }

    /// Sets the status of an issue on behalf of a representative and
    /// notifies the reporter.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::PermissionDenied`] for non-representatives,
    /// [`IssueLifecycleError::IssueNotFound`] for unknown issues,
    /// [`IssueDomainError::ReservedStatus`] for `ESCALATED`, or repository
    /// errors including concurrent modification.
    pub async fn update_status(
        &self,
        actor: UserId,
        issue_id: IssueId,
        status: IssueStatus,
    ) -> IssueLifecycleResult<Issue> {
        self.require_representative(actor).await?;
        let mut issue = self.find(issue_id).await?;
        let expected = issue.version();
        issue.update_status(status, &*self.clock)?;
        self.issues.update(&issue, expected).await?;
        info!(issue_id = %issue_id, actor = %actor, %status, "issue status updated");

        let message = NotificationMessage::StatusChanged {
            title: issue.title().to_owned(),
            status,
        };
        self.dispatcher
            .notify_best_effort(issue.reported_by(), Some(issue_id), &message)
            .await;
        Ok(issue)
    }

    /// Notifies the parties of an issue about a new comment.
    ///
    /// A representative's comment goes to the reporter only; anyone else's
    /// comment goes to every representative of the issue's taluka. The
    /// comment body itself is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::EmptyComment`] for blank comments, or
    /// lookup errors for unknown authors and issues.
    pub async fn add_comment(
        &self,
        author: UserId,
        issue_id: IssueId,
        comment: &str,
    ) -> IssueLifecycleResult<Vec<Notification>> {
        let body = comment.trim();
        if body.is_empty() {
            return Err(IssueLifecycleError::EmptyComment);
        }
        let commenter = self.directory.require_user(author).await?;
        let issue = self.find(issue_id).await?;

        let delivered = if commenter.is_representative() {
            let message = NotificationMessage::representative_comment(issue.title(), body);
            self.dispatcher
                .notify_all(&[issue.reported_by()], Some(issue_id), &message)
                .await
        } else {
            let recipients = self.taluka_recipients(&issue).await;
            let message = NotificationMessage::citizen_comment(issue.title(), body);
            self.dispatcher
                .notify_all(&recipients, Some(issue_id), &message)
                .await
        };
        Ok(delivered)
    }

    /// Lists the issues of a representative's taluka, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::PermissionDenied`] for
    /// non-representatives, or repository errors.
    pub async fn list_for_representative(&self, actor: UserId) -> IssueLifecycleResult<Vec<Issue>> {
        let representative = self.require_representative(actor).await?;
        let Some(taluka) = representative.jurisdiction().taluka() else {
            return Ok(Vec::new());
        };
        Ok(self.issues.find_by_taluka(taluka).await?)
    }

    /// Loads an issue that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::IssueNotFound`] when the issue does not
    /// exist, or repository errors.
    pub async fn find(&self, issue_id: IssueId) -> IssueLifecycleResult<Issue> {
        self.issues
            .find_by_id(issue_id)
            .await?
            .ok_or(IssueLifecycleError::IssueNotFound(issue_id))
    }

    async fn require_representative(&self, actor: UserId) -> IssueLifecycleResult<User> {
        let user = self.directory.require_user(actor).await?;
        if !user.is_representative() {
            return Err(IssueLifecycleError::PermissionDenied(actor));
        }
        Ok(user)
    }

    /// Resolves taluka recipients, treating lookup failures as "nobody".
    async fn taluka_recipients(&self, issue: &Issue) -> Vec<UserId> {
        match self.directory.taluka_representatives(issue.jurisdiction()).await {
            Ok(representatives) => representatives.iter().map(User::id).collect(),
            Err(err) => {
                warn!(
                    issue_id = %issue.id(),
                    error = %err,
                    "taluka representative lookup failed; skipping notifications"
                );
                Vec::new()
            }
        }
    }
}
