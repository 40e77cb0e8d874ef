//! Runs the escalation sweep against `PostgreSQL` on a fixed interval.
//!
//! Usage:
//!
//! ```text
//! escalation-sweeper [--config <path>] [--once]
//! ```
//!
//! Configuration is read from the optional TOML file and `CIVIC_`-prefixed
//! environment variables. A representative file is:
//!
//! ```toml
//! database_url = "postgres://civic@localhost/civic"
//! pool_size = 4
//! sweep_interval_secs = 3600
//! taluka_threshold_days = 7
//! district_threshold_days = 5
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use civic_escalation::{
    directory::adapters::postgres::PostgresUserDirectory,
    escalation::services::{EscalationError, EscalationScheduler},
    issue::adapters::postgres::PostgresIssueRepository,
    notification::adapters::postgres::PostgresNotificationRepository,
    settings::{SettingsError, SweeperConfig},
};
use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Errors that stop the sweeper.
#[derive(Debug, Error)]
enum SweeperError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Sweep(#[from] EscalationError),
    #[error("failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Escalates stalled civic issues")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single sweep and exit.
    #[arg(long)]
    once: bool,
}

type Scheduler = EscalationScheduler<
    PostgresIssueRepository,
    PostgresUserDirectory,
    PostgresNotificationRepository,
    DefaultClock,
>;

#[tokio::main]
async fn main() -> Result<(), SweeperError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let settings = SweeperConfig::load(cli.config.as_deref())?;
    let scheduler = build_scheduler(&settings)?;

    if cli.once {
        scheduler.run_sweep().await?;
        return Ok(());
    }
    run_forever(&scheduler, &settings).await
}

fn build_scheduler(settings: &SweeperConfig) -> Result<Scheduler, SweeperError> {
    let manager = ConnectionManager::<PgConnection>::new(settings.database_url.as_str());
    let pool = Pool::builder().max_size(settings.pool_size).build(manager)?;
    Ok(EscalationScheduler::new(
        Arc::new(PostgresIssueRepository::new(pool.clone())),
        Arc::new(PostgresUserDirectory::new(pool.clone())),
        Arc::new(PostgresNotificationRepository::new(pool)),
        Arc::new(DefaultClock),
        settings.escalation_policy(),
    ))
}

async fn run_forever(scheduler: &Scheduler, settings: &SweeperConfig) -> Result<(), SweeperError> {
    let mut interval = tokio::time::interval(settings.sweep_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(
        interval_secs = settings.sweep_interval_secs,
        "escalation sweeper started"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(err) = scheduler.run_sweep().await {
                    error!(error = %err, "escalation sweep failed");
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(SweeperError::Signal)?;
                info!("shutdown requested; stopping sweeper");
                return Ok(());
            }
        }
    }
}
