//! Applies single escalations to issues.

use super::{EscalationError, EscalationResult};
use crate::directory::{domain::UserId, ports::UserDirectory, services::DirectoryLookup};
use crate::escalation::domain::{EscalationOutcome, EscalationRequest};
use crate::issue::{
    domain::{EscalationLevel, Issue, IssueId},
    ports::IssueRepository,
};
use crate::notification::{
    ports::NotificationRepository,
    services::{NotificationDispatcher, NotificationMessage},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Escalation state machine.
///
/// Each escalation validates the transition, mutates a copy of the issue,
/// and persists it with a compare-and-swap on the issue version. Only after
/// the write succeeds are notifications dispatched; their failure is logged
/// and never undoes the escalation.
#[derive(Clone)]
pub struct EscalationStateMachine<R, D, N, C>
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

impl<R, D, N, C> EscalationStateMachine<R, D, N, C>
where
    R: IssueRepository,
    D: UserDirectory,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new state machine.
    #[must_use]
    pub fn new(issues: Arc<R>, directory: Arc<D>, notifications: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            issues,
            directory: DirectoryLookup::new(directory),
            dispatcher: NotificationDispatcher::new(notifications, Arc::clone(&clock)),
            clock,
        }
    }

    /// Loads an issue and applies `request` to it.
    ///
    /// Manual requests are authorised before the issue is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EscalationError::PermissionDenied`] or
    /// [`EscalationError::UserNotFound`] for unauthorised actors,
    /// [`EscalationError::IssueNotFound`] for unknown issues,
    /// [`EscalationError::InvalidTransition`] for disallowed level changes,
    /// and [`EscalationError::ConcurrentModification`] when another writer
    /// changed the issue first.
    pub async fn escalate(
        &self,
        issue_id: IssueId,
        request: EscalationRequest,
    ) -> EscalationResult<EscalationOutcome> {
        if let EscalationRequest::Manual { actor } = request {
            self.authorize(actor).await?;
        }
        let issue = self
            .issues
            .find_by_id(issue_id)
            .await?
            .ok_or(EscalationError::IssueNotFound(issue_id))?;
        self.apply(issue, request).await
    }

    /// Applies `request` to an already loaded issue snapshot.
    ///
    /// The snapshot's version is the expected version of the write, so a
    /// stale snapshot yields [`EscalationError::ConcurrentModification`].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`escalate`](Self::escalate), except
    /// [`EscalationError::IssueNotFound`] is only raised when the issue
    /// disappears before the write.
    pub async fn escalate_issue(
        &self,
        issue: Issue,
        request: EscalationRequest,
    ) -> EscalationResult<EscalationOutcome> {
        if let EscalationRequest::Manual { actor } = request {
            self.authorize(actor).await?;
        }
        self.apply(issue, request).await
    }

    async fn apply(
        &self,
        issue: Issue,
        request: EscalationRequest,
    ) -> EscalationResult<EscalationOutcome> {
        match request {
            EscalationRequest::Scheduled { target, at } => {
                self.apply_scheduled(issue, target, at).await
            }
            EscalationRequest::Manual { actor } => self.apply_manual(issue, actor).await,
        }
    }

    async fn authorize(&self, actor: UserId) -> EscalationResult<()> {
        let user = self.directory.require_user(actor).await?;
        if !user.is_representative() {
            debug!(actor = %actor, "manual escalation refused for non-representative");
            return Err(EscalationError::PermissionDenied(actor));
        }
        Ok(())
    }

    async fn apply_scheduled(
        &self,
        issue: Issue,
        target: EscalationLevel,
        at: DateTime<Utc>,
    ) -> EscalationResult<EscalationOutcome> {
        issue.ensure_can_escalate_to(target)?;
        let assignee = self
            .directory
            .find_responsible_rep(target.representative_level(), issue.jurisdiction())
            .await?
            .map(|representative| representative.id());

        let previous_level = issue.escalation_level();
        let expected = issue.version();
        let mut escalated = issue;
        escalated.apply_scheduled_escalation(target, assignee, at)?;
        self.issues.update(&escalated, expected).await?;
        info!(
            issue_id = %escalated.id(),
            from = %previous_level,
            to = %target,
            assignee = ?assignee,
            "issue escalated by schedule"
        );

        let mut notifications = Vec::new();
        if let Some(assignee_id) = assignee {
            let message = NotificationMessage::EscalatedToAssignee {
                issue_id: escalated.id(),
            };
            notifications.extend(
                self.dispatcher
                    .notify_best_effort(assignee_id, Some(escalated.id()), &message)
                    .await,
            );
        }
        let message = NotificationMessage::EscalatedToReporter {
            issue_id: escalated.id(),
            level: target,
        };
        notifications.extend(
            self.dispatcher
                .notify_best_effort(escalated.reported_by(), Some(escalated.id()), &message)
                .await,
        );

        Ok(EscalationOutcome {
            issue: escalated,
            previous_level,
            assignee,
            notifications,
        })
    }

    async fn apply_manual(
        &self,
        issue: Issue,
        actor: UserId,
    ) -> EscalationResult<EscalationOutcome> {
        let previous_level = issue.escalation_level();
        let expected = issue.version();
        let mut escalated = issue;
        let target = escalated.apply_manual_escalation(&*self.clock)?;
        self.issues.update(&escalated, expected).await?;
        info!(
            issue_id = %escalated.id(),
            actor = %actor,
            from = %previous_level,
            to = %target,
            "issue escalated manually"
        );

        let message = NotificationMessage::ManuallyEscalated {
            title: escalated.title().to_owned(),
            level: target,
        };
        let notifications = self
            .dispatcher
            .notify_best_effort(escalated.reported_by(), Some(escalated.id()), &message)
            .await
            .into_iter()
            .collect();

        Ok(EscalationOutcome {
            issue: escalated,
            previous_level,
            assignee: None,
            notifications,
        })
    }
}
