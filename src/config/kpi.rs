//! KPI batch configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Limits applied to batch KPI runs
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KpiConfig {
    /// Upper bound for measuring one metric/project pair
    #[serde(default = "default_item_timeout")]
    pub item_timeout_secs: u64,

    /// Pairs measured concurrently
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl KpiConfig {
    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.item_timeout_secs == 0 || self.item_timeout_secs > 3600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_concurrency == 0 || self.max_concurrency > 256 {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            item_timeout_secs: default_item_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_item_timeout() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_defaults() {
        let config = KpiConfig::default();
        assert_eq!(config.item_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_concurrency, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_limits_are_validated() {
        let no_workers = KpiConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert_eq!(no_workers.validate(), Err(ValidationError::InvalidConcurrency));

        let no_timeout = KpiConfig {
            item_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(no_timeout.validate(), Err(ValidationError::InvalidTimeout));
    }
}
