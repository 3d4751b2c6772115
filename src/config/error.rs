//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Interval for {0} must be at least one second")]
    InvalidInterval(&'static str),

    #[error("KPI item timeout must be between 1 and 3600 seconds")]
    InvalidTimeout,

    #[error("KPI max concurrency must be between 1 and 256")]
    InvalidConcurrency,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),
}
