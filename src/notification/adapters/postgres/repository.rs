//! `PostgreSQL` repository implementation for notification storage.

use super::{
    models::{NewNotificationRow, NotificationRow},
    schema::notifications,
};
use crate::directory::domain::UserId;
use crate::issue::domain::IssueId;
use crate::notification::{
    domain::{Notification, NotificationId, NotificationKind, PersistedNotificationData},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by notification adapters.
pub type NotificationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed notification repository.
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: NotificationPgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NotificationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NotificationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(NotificationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NotificationRepositoryError::persistence)?
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let notification_id = notification.id();
        let row = NewNotificationRow {
            id: notification_id.into_inner(),
            recipient_id: notification.recipient().into_inner(),
            issue_id: notification.issue().map(IssueId::into_inner),
            text: notification.text().to_owned(),
            kind: notification.kind().as_str().to_owned(),
            is_read: notification.is_read(),
            created_at: notification.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NotificationRepositoryError::DuplicateNotification(notification_id)
                    }
                    _ => NotificationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        self.run_blocking(move |connection| {
            let row = notifications::table
                .filter(notifications::id.eq(id.into_inner()))
                .select(NotificationRow::as_select())
                .first::<NotificationRow>(connection)
                .optional()
                .map_err(NotificationRepositoryError::persistence)?;
            row.map(row_to_notification).transpose()
        })
        .await
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()))
                .order(notifications::created_at.desc())
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_notification).collect()
        })
        .await
    }

    async fn mark_read(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> NotificationRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                notifications::table
                    .filter(notifications::id.eq(id.into_inner()))
                    .filter(notifications::recipient_id.eq(recipient.into_inner())),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)
            .map_err(NotificationRepositoryError::persistence)?;

            if affected == 0 {
                return Err(NotificationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn mark_all_read(&self, recipient: UserId) -> NotificationRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                notifications::table
                    .filter(notifications::recipient_id.eq(recipient.into_inner()))
                    .filter(notifications::is_read.eq(false)),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)
            .map_err(NotificationRepositoryError::persistence)?;
            u64::try_from(affected).map_err(NotificationRepositoryError::persistence)
        })
        .await
    }
}

fn row_to_notification(row: NotificationRow) -> NotificationRepositoryResult<Notification> {
    let NotificationRow {
        id,
        recipient_id,
        issue_id,
        text,
        kind: persisted_kind,
        is_read,
        created_at,
    } = row;

    let kind = NotificationKind::try_from(persisted_kind.as_str())
        .map_err(NotificationRepositoryError::invalid_persisted_data)?;

    Ok(Notification::from_persisted(PersistedNotificationData {
        id: NotificationId::from_uuid(id),
        recipient: UserId::from_uuid(recipient_id),
        issue: issue_id.map(IssueId::from_uuid),
        text,
        kind,
        is_read,
        created_at,
    }))
}
