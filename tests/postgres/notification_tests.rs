//! Inbox persistence against `PostgreSQL`.

use super::helpers::{BoxError, PgContext, pg_context};
use chrono::Duration;
use civic_escalation::directory::domain::User;
use civic_escalation::issue::ports::IssueRepository;
use civic_escalation::notification::{
    domain::{Notification, NotificationKind},
    ports::{NotificationRepository, NotificationRepositoryError},
};
use rstest::rstest;

async fn deliver(
    ctx: &PgContext,
    recipient: &User,
    text: &str,
    kind: NotificationKind,
) -> Result<Notification, BoxError> {
    let notification = Notification::new(recipient.id(), None, text, kind, &ctx.clock)?;
    ctx.notifications().append(&notification).await?;
    ctx.clock.advance(Duration::minutes(1));
    Ok(notification)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_all_read_counts_only_unread_notifications_of_the_recipient(
    #[future] pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = pg_context.await? else {
        return Ok(());
    };
    let repository = ctx.notifications();
    let asha = ctx.citizen("asha").await?;
    let ravi = ctx.citizen("ravi").await?;
    let already_read = deliver(&ctx, &asha, "Comment added", NotificationKind::Comment).await?;
    deliver(&ctx, &asha, "Status updated", NotificationKind::Status).await?;
    deliver(&ctx, &asha, "Issue escalated", NotificationKind::Escalation).await?;
    deliver(&ctx, &ravi, "Status updated", NotificationKind::Status).await?;
    repository.mark_read(asha.id(), already_read.id()).await?;

    let first = repository.mark_all_read(asha.id()).await?;
    let second = repository.mark_all_read(asha.id()).await?;

    assert_eq!((first, second), (2, 0));
    let ravi_inbox = repository.list_for_recipient(ravi.id()).await?;
    assert_eq!(ravi_inbox.len(), 1);
    assert!(ravi_inbox.iter().all(|notification| !notification.is_read()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn marking_another_recipients_notification_is_not_found(
    #[future] pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = pg_context.await? else {
        return Ok(());
    };
    let repository = ctx.notifications();
    let asha = ctx.citizen("asha").await?;
    let ravi = ctx.citizen("ravi").await?;
    let for_asha = deliver(&ctx, &asha, "Status updated", NotificationKind::Status).await?;

    let result = repository.mark_read(ravi.id(), for_asha.id()).await;

    assert!(matches!(
        result,
        Err(NotificationRepositoryError::NotFound(id)) if id == for_asha.id()
    ));
    let stored = repository.find_by_id(for_asha.id()).await?;
    assert_eq!(stored.map(|notification| notification.is_read()), Some(false));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inbox_lists_newest_first_with_issue_links(
    #[future] pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = pg_context.await? else {
        return Ok(());
    };
    let repository = ctx.notifications();
    let asha = ctx.citizen("asha").await?;
    let issue = ctx.report("Broken streetlight", &asha)?;
    ctx.issues().store(&issue).await?;
    let older = deliver(&ctx, &asha, "Comment added", NotificationKind::Comment).await?;
    let linked = Notification::new(
        asha.id(),
        Some(issue.id()),
        "Issue escalated",
        NotificationKind::Escalation,
        &ctx.clock,
    )?;
    repository.append(&linked).await?;

    let inbox = repository.list_for_recipient(asha.id()).await?;

    assert_eq!(inbox, vec![linked, older]);
    Ok(())
}
