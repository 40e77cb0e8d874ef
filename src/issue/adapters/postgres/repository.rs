//! `PostgreSQL` repository implementation for issue storage.

use super::{
    models::{IssueRecord, IssueRow},
    schema::issues,
};
use crate::directory::domain::{Jurisdiction, UserId};
use crate::issue::{
    domain::{
        EscalationCandidateQuery, EscalationLevel, Issue, IssueId, IssuePriority, IssueStatus,
        IssueVersion, PersistedIssueData,
    },
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by issue adapters.
pub type IssuePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed issue repository.
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: IssuePgPool,
}

impl PostgresIssueRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IssuePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IssueRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IssueRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IssueRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IssueRepositoryError::persistence)?
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueRepository {
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let record = to_record(issue)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(issues::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        IssueRepositoryError::DuplicateIssue(issue_id)
                    }
                    _ => IssueRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
    ) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let record = to_record(issue)?;
        let expected = version_to_column(expected_version)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                issues::table
                    .filter(issues::id.eq(issue_id.into_inner()))
                    .filter(issues::version.eq(expected)),
            )
            .set(&record)
            .execute(connection)
            .map_err(IssueRepositoryError::persistence)?;

            if affected == 1 {
                return Ok(());
            }

            let exists = diesel::select(diesel::dsl::exists(
                issues::table.filter(issues::id.eq(issue_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(IssueRepositoryError::persistence)?;

            if exists {
                Err(IssueRepositoryError::ConcurrentModification {
                    issue_id,
                    expected: expected_version,
                })
            } else {
                Err(IssueRepositoryError::NotFound(issue_id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let row = issues::table
                .filter(issues::id.eq(id.into_inner()))
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()
                .map_err(IssueRepositoryError::persistence)?;
            row.map(row_to_issue).transpose()
        })
        .await
    }

    async fn find_escalation_candidates(
        &self,
        query: &EscalationCandidateQuery,
    ) -> IssueRepositoryResult<Vec<Issue>> {
        let candidate_query = *query;
        let awaiting_action: Vec<&'static str> = IssueStatus::AWAITING_ACTION
            .iter()
            .map(|status| status.as_str())
            .collect();
        let level = i16::from(candidate_query.current_level().value());

        self.run_blocking(move |connection| {
            let base = issues::table
                .filter(issues::status.eq_any(awaiting_action))
                .filter(issues::escalation_level.eq(level))
                .select(IssueRow::as_select());

            let rows = match candidate_query {
                EscalationCandidateQuery::TalukaOverdue { reported_before } => base
                    .filter(issues::created_at.le(reported_before))
                    .load::<IssueRow>(connection),
                EscalationCandidateQuery::DistrictOverdue { escalated_before } => base
                    .filter(issues::last_escalated_at.le(escalated_before))
                    .load::<IssueRow>(connection),
            }
            .map_err(IssueRepositoryError::persistence)?;

            rows.into_iter().map(row_to_issue).collect()
        })
        .await
    }

    async fn find_by_taluka(&self, taluka: &str) -> IssueRepositoryResult<Vec<Issue>> {
        let lookup_taluka = taluka.trim().to_owned();

        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(concat!(
                "SELECT id, title, description, location, state, district, taluka, pincode, ",
                "status, priority, escalation_level, last_escalated_at, reported_by, ",
                "assigned_to, created_at, updated_at, version ",
                "FROM issues ",
                "WHERE LOWER(taluka) = LOWER($1) ",
                "ORDER BY created_at DESC",
            ))
            .bind::<diesel::sql_types::Text, _>(lookup_taluka)
            .load::<IssueRow>(connection)
            .map_err(IssueRepositoryError::persistence)?;
            rows.into_iter().map(row_to_issue).collect()
        })
        .await
    }
}

fn version_to_column(version: IssueVersion) -> IssueRepositoryResult<i64> {
    i64::try_from(version.value()).map_err(IssueRepositoryError::persistence)
}

fn to_record(issue: &Issue) -> IssueRepositoryResult<IssueRecord> {
    let jurisdiction = issue.jurisdiction();
    Ok(IssueRecord {
        id: issue.id().into_inner(),
        title: issue.title().to_owned(),
        description: issue.description().to_owned(),
        location: issue.location().to_owned(),
        state: jurisdiction.state().map(str::to_owned),
        district: jurisdiction.district().map(str::to_owned),
        taluka: jurisdiction.taluka().map(str::to_owned),
        pincode: issue.pincode().map(str::to_owned),
        status: issue.status().as_str().to_owned(),
        priority: issue.priority().as_str().to_owned(),
        escalation_level: i16::from(issue.escalation_level().value()),
        last_escalated_at: issue.last_escalated_at(),
        reported_by: issue.reported_by().into_inner(),
        assigned_to: issue.assigned_to().map(UserId::into_inner),
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
        version: version_to_column(issue.version())?,
    })
}

fn row_to_issue(row: IssueRow) -> IssueRepositoryResult<Issue> {
    let IssueRow {
        id,
        title,
        description,
        location,
        state,
        district,
        taluka,
        pincode,
        status: persisted_status,
        priority: persisted_priority,
        escalation_level: persisted_level,
        last_escalated_at,
        reported_by,
        assigned_to,
        created_at,
        updated_at,
        version: persisted_version,
    } = row;

    let status = IssueStatus::try_from(persisted_status.as_str())
        .map_err(IssueRepositoryError::invalid_persisted_data)?;
    let priority = IssuePriority::try_from(persisted_priority.as_str())
        .map_err(IssueRepositoryError::invalid_persisted_data)?;
    let escalation_level = EscalationLevel::try_from(i64::from(persisted_level))
        .map_err(IssueRepositoryError::invalid_persisted_data)?;
    let version = u64::try_from(persisted_version)
        .map(IssueVersion::new)
        .map_err(IssueRepositoryError::invalid_persisted_data)?;

    Ok(Issue::from_persisted(PersistedIssueData {
        id: IssueId::from_uuid(id),
        title,
        description,
        location,
        jurisdiction: Jurisdiction::from_parts(state, district, taluka),
        pincode,
        status,
        priority,
        escalation_level,
        last_escalated_at,
        reported_by: UserId::from_uuid(reported_by),
        assigned_to: assigned_to.map(UserId::from_uuid),
        created_at,
        updated_at,
        version,
    }))
}
