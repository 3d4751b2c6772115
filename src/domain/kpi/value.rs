//! KpiValue - one append-only measurement of a metric for a project.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    KpiMetricId, KpiValueId, PhaseId, ProjectId, Timestamp, ValidationError,
};

use super::KpiMetric;

/// How badly a value misses its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// True when `value` is on the wrong side of `threshold`.
///
/// Equal to the threshold is not a breach.
pub fn is_breach(value: f64, threshold: Option<f64>, higher_is_better: bool) -> bool {
    match threshold {
        None => false,
        Some(limit) if higher_is_better => value < limit,
        Some(limit) => value > limit,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiValue {
    id: KpiValueId,
    metric_id: KpiMetricId,
    project_id: ProjectId,
    value: f64,
    measured_at: Timestamp,
    comment: Option<String>,
    phase_id: Option<PhaseId>,
    warning_threshold_breached: bool,
    critical_threshold_breached: bool,
    notification_sent: bool,
}

impl KpiValue {
    /// Records a measurement, evaluating both breach flags against the
    /// metric's thresholds. The flags are fixed from here on.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `value` is NaN or infinite
    pub fn record(
        metric: &KpiMetric,
        project_id: ProjectId,
        value: f64,
        measured_at: Timestamp,
        comment: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::out_of_range(
                "value",
                f64::MIN,
                f64::MAX,
                value,
            ));
        }

        let thresholds = metric.thresholds();
        let higher_is_better = metric.higher_is_better();

        Ok(Self {
            id: KpiValueId::new(),
            metric_id: *metric.id(),
            project_id,
            value,
            measured_at,
            comment,
            phase_id: metric.phase_id().copied(),
            warning_threshold_breached: is_breach(value, thresholds.warning, higher_is_better),
            critical_threshold_breached: is_breach(value, thresholds.critical, higher_is_better),
            notification_sent: false,
        })
    }

    pub fn id(&self) -> &KpiValueId {
        &self.id
    }

    pub fn metric_id(&self) -> &KpiMetricId {
        &self.metric_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn measured_at(&self) -> &Timestamp {
        &self.measured_at
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn phase_id(&self) -> Option<&PhaseId> {
        self.phase_id.as_ref()
    }

    pub fn warning_threshold_breached(&self) -> bool {
        self.warning_threshold_breached
    }

    pub fn critical_threshold_breached(&self) -> bool {
        self.critical_threshold_breached
    }

    pub fn notification_sent(&self) -> bool {
        self.notification_sent
    }

    /// Critical takes precedence over warning.
    pub fn severity(&self) -> Option<Severity> {
        if self.critical_threshold_breached {
            Some(Severity::Critical)
        } else if self.warning_threshold_breached {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    pub fn is_breached(&self) -> bool {
        self.severity().is_some()
    }

    /// Breached and not yet notified.
    pub fn awaits_notification(&self) -> bool {
        self.is_breached() && !self.notification_sent
    }

    /// Sets the notified flag. Returns `false` if it was already set.
    pub fn mark_notified(&mut self) -> bool {
        if self.notification_sent {
            return false;
        }
        self.notification_sent = true;
        true
    }
}
