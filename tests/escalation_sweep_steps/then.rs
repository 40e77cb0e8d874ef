//! Then steps for escalation sweep BDD scenarios.

use civic_escalation::{
    escalation::services::EscalationError, issue::domain::Issue,
    notification::domain::NotificationKind,
};
use rstest_bdd_macros::then;

use super::world::{EscalationWorld, run_async};

fn stored_issue(world: &EscalationWorld) -> Result<Issue, eyre::Report> {
    let issue_id = world.issue()?.id();
    run_async(world.lifecycle.find(issue_id))
        .map_err(|err| eyre::eyre!("issue lookup failed: {err}"))
}

#[then("the sweep reports {count:usize} district escalations")]
fn sweep_reports_district(world: &EscalationWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_sweep
        .ok_or_else(|| eyre::eyre!("no sweep has run in scenario world"))?;
    if report.taluka_escalated != count {
        return Err(eyre::eyre!(
            "expected {count} district escalations, found {}",
            report.taluka_escalated
        ));
    }
    Ok(())
}

#[then("the sweep reports {count:usize} state escalations")]
fn sweep_reports_state(world: &EscalationWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_sweep
        .ok_or_else(|| eyre::eyre!("no sweep has run in scenario world"))?;
    if report.district_escalated != count {
        return Err(eyre::eyre!(
            "expected {count} state escalations, found {}",
            report.district_escalated
        ));
    }
    Ok(())
}

#[then("the issue sits at escalation level {level:u8}")]
fn issue_at_level(world: &EscalationWorld, level: u8) -> Result<(), eyre::Report> {
    let issue = stored_issue(world)?;
    let actual = issue.escalation_level().value();
    if actual != level {
        return Err(eyre::eyre!("expected level {level}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the issue is assigned to "{name}""#)]
fn issue_assigned_to(world: &EscalationWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.user(&name)?.id();
    let issue = stored_issue(world)?;
    if issue.assigned_to() != Some(expected) {
        return Err(eyre::eyre!(
            "expected assignee {name}, found {:?}",
            issue.assigned_to()
        ));
    }
    Ok(())
}

#[then("the issue has no assignee")]
fn issue_unassigned(world: &EscalationWorld) -> Result<(), eyre::Report> {
    let issue = stored_issue(world)?;
    if let Some(assignee) = issue.assigned_to() {
        return Err(eyre::eyre!("expected no assignee, found {assignee}"));
    }
    Ok(())
}

#[then(r#""{name}" has {count:usize} escalation notifications"#)]
fn escalation_notification_count(
    world: &EscalationWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let recipient = world.user(&name)?.id();
    let inbox = run_async(world.dispatcher.inbox(recipient))
        .map_err(|err| eyre::eyre!("inbox lookup failed: {err}"))?;
    let escalations = inbox
        .iter()
        .filter(|notification| notification.kind() == NotificationKind::Escalation)
        .count();
    if escalations != count {
        return Err(eyre::eyre!(
            "expected {count} escalation notifications for {name}, found {escalations}"
        ));
    }
    Ok(())
}

#[then("the manual escalation is refused for lack of permission")]
fn manual_escalation_refused(world: &EscalationWorld) -> Result<(), eyre::Report> {
    let result = world
        .manual_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no manual escalation attempted in scenario world"))?;
    if !matches!(result, Err(EscalationError::PermissionDenied(_))) {
        return Err(eyre::eyre!("expected permission denied, got {result:?}"));
    }
    Ok(())
}
