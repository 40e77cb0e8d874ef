//! When steps for escalation sweep BDD scenarios.

use chrono::Duration;
use civic_escalation::issue::domain::IssueStatus;
use eyre::WrapErr;
use rstest_bdd_macros::when;

use super::world::{EscalationWorld, run_async};

fn run_sweep(world: &mut EscalationWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.scheduler.run_sweep()).wrap_err("run escalation sweep")?;
    world.last_sweep = Some(report);
    Ok(())
}

#[when("the escalation sweep runs")]
fn sweep_runs(world: &mut EscalationWorld) -> Result<(), eyre::Report> {
    run_sweep(world)
}

#[when("the escalation sweep runs again")]
fn sweep_runs_again(world: &mut EscalationWorld) -> Result<(), eyre::Report> {
    run_sweep(world)
}

#[when(r#""{name}" escalates the issue manually"#)]
fn escalate_manually(world: &mut EscalationWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.user(&name)?.id();
    let issue_id = world.issue()?.id();
    world.manual_result = Some(run_async(
        world.scheduler.escalate_manually(issue_id, actor),
    ));
    Ok(())
}

#[when(r#""{name}" marks the issue in progress"#)]
fn mark_in_progress(world: &mut EscalationWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.user(&name)?.id();
    let issue_id = world.issue()?.id();
    run_async(
        world
            .lifecycle
            .update_status(actor, issue_id, IssueStatus::InProgress),
    )
    .wrap_err("update status")?;
    Ok(())
}

#[when("{days:i64} days pass")]
fn days_pass(world: &mut EscalationWorld, days: i64) {
    world.clock.advance(Duration::days(days));
}
