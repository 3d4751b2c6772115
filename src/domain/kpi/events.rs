//! KPI domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, KpiMetricId, KpiValueId, ProjectId, Timestamp,
};

use super::{KpiMetric, KpiValue, Severity};

/// Published once per breached KpiValue by the threshold check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiThresholdBreached {
    pub event_id: EventId,
    pub kpi_value_id: KpiValueId,
    pub metric_id: KpiMetricId,
    pub metric_code: String,
    pub metric_name: String,
    pub project_id: ProjectId,
    pub project_name: String,
    pub value: f64,
    pub unit: Option<String>,
    /// Critical when both thresholds are breached.
    pub severity: Severity,
    /// When the value was measured.
    pub measured_at: Timestamp,
    pub detected_at: Timestamp,
}

domain_event!(
    KpiThresholdBreached,
    event_type = "kpi.threshold_breached.v1",
    aggregate_id = kpi_value_id,
    aggregate_type = "KpiValue",
    occurred_at = detected_at,
    event_id = event_id
);

impl KpiThresholdBreached {
    /// `None` when the value has no breach.
    pub fn from_value(
        value: &KpiValue,
        metric: &KpiMetric,
        project_name: impl Into<String>,
    ) -> Option<Self> {
        let severity = value.severity()?;
        Some(Self {
            event_id: EventId::new(),
            kpi_value_id: *value.id(),
            metric_id: *metric.id(),
            metric_code: metric.code().to_string(),
            metric_name: metric.name().to_string(),
            project_id: *value.project_id(),
            project_name: project_name.into(),
            value: value.value(),
            unit: metric.unit().map(str::to_string),
            severity,
            measured_at: *value.measured_at(),
            detected_at: Timestamp::now(),
        })
    }
}
