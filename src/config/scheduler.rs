//! Scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Cadence of the periodic KPI jobs
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Seconds between automatic metric updates
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: u64,

    /// Seconds between threshold checks
    #[serde(default = "default_threshold_interval")]
    pub threshold_interval_secs: u64,

    #[serde(default = "default_enabled")]
    pub update_enabled: bool,

    #[serde(default = "default_enabled")]
    pub threshold_enabled: bool,
}

impl ScheduleConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn threshold_interval(&self) -> Duration {
        Duration::from_secs(self.threshold_interval_secs)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.update_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("metric update"));
        }
        if self.threshold_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("threshold check"));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval(),
            threshold_interval_secs: default_threshold_interval(),
            update_enabled: default_enabled(),
            threshold_enabled: default_enabled(),
        }
    }
}

fn default_update_interval() -> u64 {
    3600
}

fn default_threshold_interval() -> u64 {
    900
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_defaults() {
        let config = ScheduleConfig::default();
        assert_eq!(config.update_interval(), Duration::from_secs(3600));
        assert_eq!(config.threshold_interval(), Duration::from_secs(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = ScheduleConfig {
            threshold_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidInterval("threshold check"))
        );
    }
}
