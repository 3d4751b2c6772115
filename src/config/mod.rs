//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PORTFOLIO_PULSE` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a runnable config.
//!
//! # Example
//!
//! ```no_run
//! use portfolio_pulse::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Threshold check every {:?}", config.scheduler.threshold_interval());
//! ```

mod error;
mod kpi;
mod logging;
mod scheduler;

pub use error::{ConfigError, ValidationError};
pub use kpi::KpiConfig;
pub use logging::LoggingConfig;
pub use scheduler::ScheduleConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Periodic job cadence
    #[serde(default)]
    pub scheduler: ScheduleConfig,

    /// Batch KPI limits
    #[serde(default)]
    pub kpi: KpiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PORTFOLIO_PULSE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PORTFOLIO_PULSE__SCHEDULER__UPDATE_INTERVAL_SECS=600` -> `scheduler.update_interval_secs = 600`
    /// - `PORTFOLIO_PULSE__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PORTFOLIO_PULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scheduler.validate()?;
        self.kpi.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "PORTFOLIO_PULSE__SCHEDULER__UPDATE_INTERVAL_SECS",
        "PORTFOLIO_PULSE__SCHEDULER__THRESHOLD_ENABLED",
        "PORTFOLIO_PULSE__KPI__MAX_CONCURRENCY",
        "PORTFOLIO_PULSE__LOGGING__JSON",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PORTFOLIO_PULSE__SCHEDULER__UPDATE_INTERVAL_SECS", "600");
        env::set_var("PORTFOLIO_PULSE__SCHEDULER__THRESHOLD_ENABLED", "false");
        env::set_var("PORTFOLIO_PULSE__KPI__MAX_CONCURRENCY", "2");
        env::set_var("PORTFOLIO_PULSE__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.scheduler.update_interval(), Duration::from_secs(600));
        assert!(!config.scheduler.threshold_enabled);
        assert_eq!(config.kpi.max_concurrency, 2);
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_validated_rejects_bad_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PORTFOLIO_PULSE__KPI__MAX_CONCURRENCY", "0");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::InvalidConcurrency))
        ));
    }
}
