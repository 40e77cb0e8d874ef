//! Cluster lifecycle helpers for `PostgreSQL` integration tests.

use crate::test_helpers::EnvVarGuard;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{
    ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests, detect_execution_privileges,
};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use std::ffi::{OsStr, OsString};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::Runtime;
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

static SHARED_CLUSTER: OnceLock<Result<ManagedCluster, String>> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ManagedCluster;

/// Managed embedded `PostgreSQL` cluster for test lifecycles.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn new() -> Result<Self, BoxError> {
        let worker_env = worker_env_changes()?;
        let worker_guard = EnvVarGuard::set_many(&worker_env);
        let mut bootstrap = bootstrap_for_tests().map_err(|err| Box::new(err) as BoxError)?;
        drop(worker_guard);
        sync_password_from_file(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            runtime: None,
            postgres: None,
        };
        cluster.start()?;
        Ok(cluster)
    }

    /// Builds a connection URL for a database on this cluster.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    /// Creates the template database and migrates it, once per cluster.
    pub fn ensure_template_exists<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let _guard = template_lock();

        if self.database_exists(template)? {
            return Ok(());
        }

        self.execute_admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    /// Clones `template` into a fresh, uniquely named database.
    pub fn temporary_database_from_template(
        &'static self,
        template: &str,
    ) -> Result<TemporaryDatabase, BoxError> {
        let name = format!("civic_test_{}", Uuid::new_v4().simple());
        {
            // Template copies fail while another copy holds the source open.
            let _guard = template_lock();
            self.execute_admin_sql(&format!(
                "CREATE DATABASE {} TEMPLATE {}",
                quote_identifier(&name),
                quote_identifier(template),
            ))?;
        }
        Ok(TemporaryDatabase {
            cluster: self,
            name,
        })
    }

    fn drop_database(&self, name: &str) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(name)
        ))
    }

    fn start(&mut self) -> Result<(), BoxError> {
        match self.bootstrap.privileges {
            ExecutionPrivileges::Root => self.start_via_worker(),
            ExecutionPrivileges::Unprivileged => self.start_in_process(),
        }
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| Box::new(err) as BoxError)?;
        let env_guard = EnvVarGuard::set_many(&self.env_vars);
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres
                .setup()
                .await
                .map_err(|err| Box::new(err) as BoxError)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres
                    .start()
                    .await
                    .map_err(|err| Box::new(err) as BoxError)?;
            }
            Ok::<(), BoxError>(())
        })?;
        drop(env_guard);
        self.bootstrap.settings = postgres.settings().clone();
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&mut self) -> Result<(), BoxError> {
        self.run_worker_operation(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_operation(WorkerOperation::Start, self.bootstrap.start_timeout)?;
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BoxError> {
        let Some(postgres) = self.postgres.take() else {
            if matches!(self.bootstrap.privileges, ExecutionPrivileges::Root) {
                self.run_worker_operation(WorkerOperation::Stop, self.bootstrap.shutdown_timeout)?;
            }
            return Ok(());
        };
        let Some(runtime) = &self.runtime else {
            return Ok(());
        };
        runtime.block_on(async {
            postgres
                .stop()
                .await
                .map_err(|err| Box::new(err) as BoxError)
        })
    }

    fn run_worker_operation(
        &self,
        operation: WorkerOperation,
        timeout: Duration,
    ) -> Result<(), BoxError> {
        let worker = self.bootstrap.worker_binary.as_ref().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set for worker operation",
            )) as BoxError
        })?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args)).map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }

    fn admin_connection(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(&self.database_url("postgres"))
            .map_err(|err| Box::new(err) as BoxError)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn = self.admin_connection()?;
        diesel::sql_query(sql)
            .execute(&mut conn)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = self.admin_connection()?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(name)
        .get_result::<ExistsRow>(&mut conn)
        .map_err(|err| Box::new(err) as BoxError)?;
        Ok(row.exists)
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Database cloned from the migrated template, dropped with the guard.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TemporaryDatabase {
    /// Returns the connection URL for this database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Returns the shared cluster, starting it on first use.
///
/// Yields `None` when no cluster can be started in this environment, for
/// example when running as root without `PG_EMBEDDED_WORKER`.
#[expect(
    clippy::print_stderr,
    reason = "skipped database tests must say why in the test output"
)]
pub fn shared_cluster() -> Option<PostgresCluster> {
    let started =
        SHARED_CLUSTER.get_or_init(|| ManagedCluster::new().map_err(|err| err.to_string()));
    match started {
        Ok(cluster) => Some(cluster),
        Err(reason) => {
            eprintln!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {reason}");
            None
        }
    }
}

fn template_lock() -> std::sync::MutexGuard<'static, ()> {
    TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let (dir, file_name) = open_parent_dir(&settings.password_file)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(Box::new(err) as BoxError),
    }
    Ok(())
}

fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let data_dir = open_ambient_dir(&settings.data_dir)?;
    let contents = match data_dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(Box::new(err) as BoxError),
    };

    let Some(port_value) = contents.lines().nth(3).map(str::trim) else {
        return Ok(());
    };
    let Ok(port) = port_value.parse::<u16>() else {
        return Ok(());
    };
    settings.port = port;
    Ok(())
}

fn worker_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "running as root requires PG_EMBEDDED_WORKER to name a worker binary",
        )) as BoxError);
    }

    let mut changes = Vec::new();
    if let Some(port) = resolve_pg_port()? {
        changes.push((OsString::from("PG_PORT"), Some(port)));
    }
    Ok(changes)
}

fn resolve_pg_port() -> Result<Option<OsString>, BoxError> {
    if std::env::var_os("PG_PORT").is_some() {
        return Ok(None);
    }

    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|err| Box::new(err) as BoxError)?;
    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|err| Box::new(err) as BoxError)?;
    drop(listener);

    Ok(Some(OsString::from(port.to_string())))
}

fn open_ambient_dir(path: &Path) -> Result<Dir, BoxError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| Box::new(err) as BoxError)
}

fn open_parent_dir(path: &Path) -> Result<(Dir, &OsStr), BoxError> {
    let file_name = path.file_name().ok_or_else(|| {
        Box::new(std::io::Error::other("path must include a file name")) as BoxError
    })?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let dir = open_ambient_dir(parent)?;
    Ok((dir, file_name))
}
