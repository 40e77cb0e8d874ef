//! End-to-end flows from issue report to the State tier.

use chrono::Duration;
use civic_escalation::{
    directory::domain::RepresentativeLevel,
    escalation::{domain::SweepReport, services::EscalationError},
    issue::domain::{EscalationLevel, IssueStatus},
    notification::domain::NotificationKind,
};
use rstest::rstest;

use super::helpers::{CivicSystem, pothole, system};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stalled_issue_climbs_to_state_tier(system: CivicSystem) {
    let reporter = system.citizen("meera").await;
    let tehsildar = system
        .representative("tehsildar", RepresentativeLevel::Taluka)
        .await;
    let collector = system
        .representative("collector", RepresentativeLevel::District)
        .await;
    let secretary = system
        .representative("secretary", RepresentativeLevel::State)
        .await;
    let issue = system
        .lifecycle
        .report_issue(reporter.id(), pothole())
        .await
        .expect("report should succeed");

    system.clock.advance(Duration::days(6));
    let early = system.scheduler.run_sweep().await.expect("sweep");
    assert_eq!(early, SweepReport::default());

    system.clock.advance(Duration::days(1) + Duration::minutes(1));
    let first = system.scheduler.run_sweep().await.expect("sweep");
    assert_eq!(first.taluka_escalated, 1);
    let at_district = system.lifecycle.find(issue.id()).await.expect("issue");
    assert_eq!(at_district.assigned_to(), Some(collector.id()));
    assert_eq!(at_district.status(), IssueStatus::Escalated);

    system
        .lifecycle
        .update_status(collector.id(), issue.id(), IssueStatus::InProgress)
        .await
        .expect("collector picks the issue up");
    system.clock.advance(Duration::days(5));
    let second = system.scheduler.run_sweep().await.expect("sweep");
    assert_eq!(second.district_escalated, 1);

    let at_state = system.lifecycle.find(issue.id()).await.expect("issue");
    assert_eq!(at_state.escalation_level(), EscalationLevel::State);
    assert_eq!(at_state.assigned_to(), Some(secretary.id()));

    system
        .lifecycle
        .update_status(secretary.id(), issue.id(), IssueStatus::InProgress)
        .await
        .expect("secretary picks the issue up");
    system.clock.advance(Duration::days(30));
    let idle = system.scheduler.run_sweep().await.expect("sweep");
    assert_eq!(idle.total_escalated(), 0);

    let reporter_inbox = system.dispatcher.inbox(reporter.id()).await.expect("inbox");
    let escalation_texts: Vec<&str> = reporter_inbox
        .iter()
        .filter(|n| n.kind() == NotificationKind::Escalation)
        .map(|n| n.text())
        .collect();
    assert_eq!(
        escalation_texts,
        vec![
            format!("Your issue #{} has been escalated to Level 2.", issue.id()),
            format!("Your issue #{} has been escalated to Level 1.", issue.id()),
        ]
    );
    let tehsildar_inbox = system.dispatcher.inbox(tehsildar.id()).await.expect("inbox");
    assert_eq!(tehsildar_inbox.len(), 1);
    assert!(tehsildar_inbox.iter().all(|n| n.kind() == NotificationKind::NewIssue));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolved_issue_is_never_escalated(system: CivicSystem) {
    let reporter = system.citizen("meera").await;
    let tehsildar = system
        .representative("tehsildar", RepresentativeLevel::Taluka)
        .await;
    let issue = system
        .lifecycle
        .report_issue(reporter.id(), pothole())
        .await
        .expect("report should succeed");
    system
        .lifecycle
        .update_status(tehsildar.id(), issue.id(), IssueStatus::Resolved)
        .await
        .expect("resolve");

    system.clock.advance(Duration::days(90));
    let report = system.scheduler.run_sweep().await.expect("sweep");
    let manual = system
        .scheduler
        .escalate_manually(issue.id(), tehsildar.id())
        .await;

    assert_eq!(report, SweepReport::default());
    assert!(matches!(manual, Err(EscalationError::InvalidTransition(_))));
    let stored = system.lifecycle.find(issue.id()).await.expect("issue");
    assert_eq!(stored.escalation_level(), EscalationLevel::Taluka);
    assert_eq!(stored.status(), IssueStatus::Resolved);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn citizen_cannot_escalate_own_issue(system: CivicSystem) {
    let reporter = system.citizen("meera").await;
    let issue = system
        .lifecycle
        .report_issue(reporter.id(), pothole())
        .await
        .expect("report should succeed");

    let result = system
        .scheduler
        .escalate_manually(issue.id(), reporter.id())
        .await;

    assert!(matches!(result, Err(EscalationError::PermissionDenied(_))));
    assert!(
        system
            .dispatcher
            .inbox(reporter.id())
            .await
            .expect("inbox")
            .is_empty()
    );
}
