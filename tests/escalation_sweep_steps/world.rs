//! Shared world state for escalation sweep BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use civic_escalation::{
    directory::{adapters::memory::InMemoryUserDirectory, domain::{Jurisdiction, User}},
    escalation::{
        domain::{EscalationOutcome, EscalationPolicy, SweepReport},
        services::{EscalationError, EscalationScheduler},
    },
    issue::{
        adapters::memory::InMemoryIssueRepository,
        domain::{Issue, IssueDraft},
        services::IssueLifecycleService,
    },
    notification::{
        adapters::memory::InMemoryNotificationRepository, services::NotificationDispatcher,
    },
};
use rstest::fixture;

use crate::test_helpers::{ManualClock, scenario_start};

/// Lifecycle service used by the BDD world.
pub type TestLifecycle = IssueLifecycleService<
    InMemoryIssueRepository,
    InMemoryUserDirectory,
    InMemoryNotificationRepository,
    ManualClock,
>;

/// Scheduler used by the BDD world.
pub type TestScheduler = EscalationScheduler<
    InMemoryIssueRepository,
    InMemoryUserDirectory,
    InMemoryNotificationRepository,
    ManualClock,
>;

/// Scenario world for escalation behaviour tests.
pub struct EscalationWorld {
    /// Account store shared by the services.
    pub directory: Arc<InMemoryUserDirectory>,
    /// Clock driving issue ages.
    pub clock: Arc<ManualClock>,
    /// Issue lifecycle service.
    pub lifecycle: TestLifecycle,
    /// Escalation scheduler under test.
    pub scheduler: TestScheduler,
    /// Inbox access.
    pub dispatcher: NotificationDispatcher<InMemoryNotificationRepository, ManualClock>,
    /// Registered accounts by username.
    pub users: HashMap<String, User>,
    /// The issue under test.
    pub issue: Option<Issue>,
    /// Report of the most recent sweep.
    pub last_sweep: Option<SweepReport>,
    /// Result of the most recent manual escalation.
    pub manual_result: Option<Result<EscalationOutcome, EscalationError>>,
}

impl EscalationWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let issues = Arc::new(InMemoryIssueRepository::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let clock = Arc::new(ManualClock::new(scenario_start()));
        let lifecycle = IssueLifecycleService::new(
            Arc::clone(&issues),
            Arc::clone(&directory),
            Arc::clone(&notifications),
            Arc::clone(&clock),
        );
        let scheduler = EscalationScheduler::new(
            issues,
            Arc::clone(&directory),
            Arc::clone(&notifications),
            Arc::clone(&clock),
            EscalationPolicy::default(),
        );
        let dispatcher = NotificationDispatcher::new(notifications, Arc::clone(&clock));
        Self {
            directory,
            clock,
            lifecycle,
            scheduler,
            dispatcher,
            users: HashMap::new(),
            issue: None,
            last_sweep: None,
            manual_result: None,
        }
    }

    /// Looks up an account registered earlier in the scenario.
    pub fn user(&self, name: &str) -> Result<&User, eyre::Report> {
        self.users
            .get(name)
            .ok_or_else(|| eyre::eyre!("no user named '{name}' in scenario world"))
    }

    /// Returns the issue under test.
    pub fn issue(&self) -> Result<&Issue, eyre::Report> {
        self.issue
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no issue reported in scenario world"))
    }
}

impl Default for EscalationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> EscalationWorld {
    EscalationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Jurisdiction shared by every account and issue in the scenarios.
pub fn haveli() -> Jurisdiction {
    Jurisdiction::new()
        .with_state("Maharashtra")
        .with_district("Pune")
        .with_taluka("Haveli")
}

/// Draft for the issue under test.
pub fn streetlight() -> IssueDraft {
    IssueDraft::new(
        "Streetlight out on Station Road",
        "Dark for two weeks",
        "Station Road",
    )
    .with_jurisdiction(haveli())
}
