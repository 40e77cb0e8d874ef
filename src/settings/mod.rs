//! Runtime configuration for the escalation sweeper.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `CIVIC_`-prefixed environment variables (for example
//! `CIVIC_DATABASE_URL` or `CIVIC_SWEEP_INTERVAL_SECS`).

use crate::escalation::domain::EscalationPolicy;
use chrono::Duration;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "CIVIC";

/// Largest accepted escalation threshold, in days.
pub const MAX_THRESHOLD_DAYS: u32 = 3650;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// A value is out of range.
    #[error("invalid configuration: {0} must be greater than zero")]
    NotPositive(&'static str),
    /// A threshold exceeds [`MAX_THRESHOLD_DAYS`].
    #[error("invalid configuration: {field} must be at most {max} days")]
    TooLarge {
        /// Offending field.
        field: &'static str,
        /// Upper bound in days.
        max: u32,
    },
}

/// Sweeper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Seconds between sweeps.
    pub sweep_interval_secs: u64,
    /// Days an issue may wait at the Taluka tier.
    pub taluka_threshold_days: u32,
    /// Days an issue may wait at the District tier after escalation.
    pub district_threshold_days: u32,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/civic".to_owned(),
            pool_size: 4,
            sweep_interval_secs: 3600,
            taluka_threshold_days: 7,
            district_threshold_days: 5,
        }
    }
}

impl SweeperConfig {
    /// Loads configuration from an optional TOML file and the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source is malformed or a value is out
    /// of range.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(file) = path {
            builder = builder.add_source(config::File::from(file).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> Result<Self, SettingsError> {
        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.pool_size == 0 {
            return Err(SettingsError::NotPositive("pool_size"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(SettingsError::NotPositive("sweep_interval_secs"));
        }
        if self.taluka_threshold_days == 0 {
            return Err(SettingsError::NotPositive("taluka_threshold_days"));
        }
        if self.district_threshold_days == 0 {
            return Err(SettingsError::NotPositive("district_threshold_days"));
        }
        for (field, days) in [
            ("taluka_threshold_days", self.taluka_threshold_days),
            ("district_threshold_days", self.district_threshold_days),
        ] {
            if days > MAX_THRESHOLD_DAYS {
                return Err(SettingsError::TooLarge {
                    field,
                    max: MAX_THRESHOLD_DAYS,
                });
            }
        }
        Ok(())
    }

    /// Returns the configured escalation thresholds.
    #[must_use]
    pub fn escalation_policy(&self) -> EscalationPolicy {
        EscalationPolicy::new(
            Duration::days(i64::from(self.taluka_threshold_days)),
            Duration::days(i64::from(self.district_threshold_days)),
        )
    }

    /// Returns the pause between sweeps.
    #[must_use]
    pub const fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}
