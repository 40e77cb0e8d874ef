//! `PostgreSQL` implementation of the account directory.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::directory::{
    domain::{
        Jurisdiction, PersistedUserData, RepresentativeLevel, RepresentativeQuery, User, UserId,
    },
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Nullable, Text};

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed account directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: DirectoryPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn register(&self, user: &User) -> UserDirectoryResult<()> {
        let new_row = to_new_row(user);
        let username = user.username().to_owned();

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserDirectoryError::DuplicateUser(username.clone())
                    }
                    _ => UserDirectoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_representatives(
        &self,
        query: &RepresentativeQuery,
    ) -> UserDirectoryResult<Vec<User>> {
        let level = query.level().map(|value| value.as_str().to_owned());
        let state = query.state().map(str::to_owned);
        let district = query.district().map(str::to_owned);
        let taluka = query.taluka().map(str::to_owned);

        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(concat!(
                "SELECT id, username, representative_level, state, district, taluka ",
                "FROM users ",
                "WHERE representative_level IS NOT NULL ",
                "AND ($1::TEXT IS NULL OR representative_level = $1) ",
                "AND ($2::TEXT IS NULL OR LOWER(state) = LOWER($2)) ",
                "AND ($3::TEXT IS NULL OR LOWER(district) = LOWER($3)) ",
                "AND ($4::TEXT IS NULL OR LOWER(taluka) = LOWER($4)) ",
                "ORDER BY id ASC",
            ))
            .bind::<Nullable<Text>, _>(level)
            .bind::<Nullable<Text>, _>(state)
            .bind::<Nullable<Text>, _>(district)
            .bind::<Nullable<Text>, _>(taluka)
            .load::<UserRow>(connection)
            .map_err(UserDirectoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    let jurisdiction = user.jurisdiction();
    NewUserRow {
        id: user.id().into_inner(),
        username: user.username().to_owned(),
        representative_level: user
            .representative_level()
            .map(|level| level.as_str().to_owned()),
        state: jurisdiction.state().map(str::to_owned),
        district: jurisdiction.district().map(str::to_owned),
        taluka: jurisdiction.taluka().map(str::to_owned),
    }
}

fn row_to_user(row: UserRow) -> UserDirectoryResult<User> {
    let UserRow {
        id,
        username,
        representative_level: persisted_level,
        state,
        district,
        taluka,
    } = row;

    let representative_level = persisted_level
        .as_deref()
        .map(RepresentativeLevel::try_from)
        .transpose()
        .map_err(UserDirectoryError::invalid_persisted_data)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(id),
        username,
        representative_level,
        jurisdiction: Jurisdiction::from_parts(state, district, taluka),
    }))
}
