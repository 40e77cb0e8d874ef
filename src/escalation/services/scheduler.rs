//! Periodic sweep over stalled issues, plus the manual escalation entry
//! point.

use super::{EscalationError, EscalationResult, EscalationStateMachine};
use crate::directory::{domain::UserId, ports::UserDirectory};
use crate::escalation::domain::{
    EscalationOutcome, EscalationPolicy, EscalationRequest, SweepReport,
};
use crate::issue::{
    domain::{EscalationCandidateQuery, Issue, IssueId},
    ports::IssueRepository,
};
use crate::notification::ports::NotificationRepository;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How one candidate fared in a sweep.
enum CandidateResult {
    Escalated,
    Skipped,
    Failed,
}

/// Escalation scheduler.
///
/// A sweep evaluates the Taluka and District predicates of its
/// [`EscalationPolicy`] and escalates every matching issue once. A failing
/// issue never stops the sweep. A candidate that loses a concurrency race
/// is reloaded and retried once if it still matches; otherwise it is
/// counted as skipped.
#[derive(Clone)]
pub struct EscalationScheduler<R, D, N, C>
where
    R: IssueRepository,
    D: UserDirectory,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    issues: Arc<R>,
    state_machine: EscalationStateMachine<R, D, N, C>,
    policy: EscalationPolicy,
    clock: Arc<C>,
}

impl<R, D, N, C> EscalationScheduler<R, D, N, C>
where
    R: IssueRepository,
    D: UserDirectory,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler.
    #[must_use]
    pub fn new(
        issues: Arc<R>,
        directory: Arc<D>,
        notifications: Arc<N>,
        clock: Arc<C>,
        policy: EscalationPolicy,
    ) -> Self {
        Self {
            state_machine: EscalationStateMachine::new(
                Arc::clone(&issues),
                directory,
                notifications,
                Arc::clone(&clock),
            ),
            issues,
            policy,
            clock,
        }
    }

    /// Returns the thresholds used by sweeps.
    #[must_use]
    pub const fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    /// Returns the underlying state machine.
    #[must_use]
    pub const fn state_machine(&self) -> &EscalationStateMachine<R, D, N, C> {
        &self.state_machine
    }

    /// Runs a sweep at the injected clock's current time.
    ///
    /// # Errors
    ///
    /// See [`run_sweep_at`](Self::run_sweep_at).
    pub async fn run_sweep(&self) -> EscalationResult<SweepReport> {
        self.run_sweep_at(self.clock.utc()).await
    }

    /// Runs a sweep as of `now`.
    ///
    /// Escalated issues get `now` as their `last_escalated_at`. Running a
    /// second sweep at the same instant escalates nothing further. A failing
    /// candidate query is logged and counted, and the other tier is still
    /// swept.
    ///
    /// # Errors
    ///
    /// Returns [`EscalationError::Repository`] when every candidate query
    /// fails. Failures of a single query or of individual escalations are
    /// counted in the report instead.
    pub async fn run_sweep_at(&self, now: DateTime<Utc>) -> EscalationResult<SweepReport> {
        let mut report = SweepReport::default();
        let queries = self.policy.candidate_queries(now);
        let mut last_query_error = None;
        for query in &queries {
            let candidates = match self.issues.find_escalation_candidates(query).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    error!(
                        level = %query.current_level(),
                        error = %err,
                        "escalation candidate query failed"
                    );
                    report.failed_queries += 1;
                    last_query_error = Some(err);
                    continue;
                }
            };
            debug!(
                level = %query.current_level(),
                cutoff = %query.cutoff(),
                candidates = candidates.len(),
                "escalation candidates selected"
            );
            for candidate in candidates {
                match self.process_candidate(candidate, query, now).await {
                    CandidateResult::Escalated => report.record_escalation(query.target_level()),
                    CandidateResult::Skipped => report.skipped += 1,
                    CandidateResult::Failed => report.failed += 1,
                }
            }
        }
        if let Some(err) = last_query_error.filter(|_| report.failed_queries == queries.len()) {
            return Err(EscalationError::Repository(err));
        }
        info!(
            taluka_escalated = report.taluka_escalated,
            district_escalated = report.district_escalated,
            skipped = report.skipped,
            failed = report.failed,
            failed_queries = report.failed_queries,
            %now,
            "escalation sweep finished"
        );
        Ok(report)
    }

    /// Escalates an issue on behalf of a representative.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`EscalationStateMachine::escalate`] for a
    /// manual request.
    pub async fn escalate_manually(
        &self,
        issue_id: IssueId,
        actor: UserId,
    ) -> EscalationResult<EscalationOutcome> {
        self.state_machine
            .escalate(issue_id, EscalationRequest::Manual { actor })
            .await
    }

    async fn process_candidate(
        &self,
        candidate: Issue,
        query: &EscalationCandidateQuery,
        now: DateTime<Utc>,
    ) -> CandidateResult {
        let issue_id = candidate.id();
        let request = EscalationRequest::Scheduled {
            target: query.target_level(),
            at: now,
        };
        match self.state_machine.escalate_issue(candidate, request).await {
            Ok(_) => CandidateResult::Escalated,
            Err(err) if err.is_concurrent_modification() => {
                warn!(issue_id = %issue_id, "escalation conflicted; retrying once");
                self.retry_candidate(issue_id, query, request).await
            }
            Err(err) => {
                log_failure(issue_id, &err);
                CandidateResult::Failed
            }
        }
    }

    async fn retry_candidate(
        &self,
        issue_id: IssueId,
        query: &EscalationCandidateQuery,
        request: EscalationRequest,
    ) -> CandidateResult {
        let reloaded = match self.issues.find_by_id(issue_id).await {
            Ok(Some(issue)) => issue,
            Ok(None) => {
                warn!(issue_id = %issue_id, "issue vanished before retry; skipping");
                return CandidateResult::Skipped;
            }
            Err(err) => {
                log_failure(issue_id, &EscalationError::from(err));
                return CandidateResult::Failed;
            }
        };
        if !query.matches(&reloaded) {
            debug!(issue_id = %issue_id, "issue no longer due after concurrent change; skipping");
            return CandidateResult::Skipped;
        }
        match self.state_machine.escalate_issue(reloaded, request).await {
            Ok(_) => CandidateResult::Escalated,
            Err(err) if err.is_concurrent_modification() => {
                warn!(issue_id = %issue_id, "escalation conflicted again; skipping");
                CandidateResult::Skipped
            }
            Err(err) => {
                log_failure(issue_id, &err);
                CandidateResult::Failed
            }
        }
    }
}

fn log_failure(issue_id: IssueId, err: &EscalationError) {
    error!(issue_id = %issue_id, error = %err, "scheduled escalation failed");
}
