//! KpiEngine - calculates KPI values and records them with breach flags.

use std::sync::Arc;

use crate::domain::foundation::{KpiMetricId, ProjectId, Timestamp};
use crate::domain::kpi::{CalculatorRegistry, KpiError, KpiMetric, KpiValue};
use crate::domain::progress::ProjectHierarchy;
use crate::ports::{KpiMetricRepository, KpiValueRepository, WorkItemRepository};

/// Command to record a measured value by hand.
#[derive(Debug, Clone)]
pub struct RecordKpiValueCommand {
    pub metric_id: KpiMetricId,
    pub project_id: ProjectId,
    pub value: f64,
    pub comment: Option<String>,
    /// Defaults to now.
    pub measured_at: Option<Timestamp>,
}

pub struct KpiEngine {
    metrics: Arc<dyn KpiMetricRepository>,
    values: Arc<dyn KpiValueRepository>,
    work_items: Arc<dyn WorkItemRepository>,
    registry: CalculatorRegistry,
}

impl KpiEngine {
    pub fn new(
        metrics: Arc<dyn KpiMetricRepository>,
        values: Arc<dyn KpiValueRepository>,
        work_items: Arc<dyn WorkItemRepository>,
    ) -> Self {
        Self::with_registry(metrics, values, work_items, CalculatorRegistry::with_defaults())
    }

    pub fn with_registry(
        metrics: Arc<dyn KpiMetricRepository>,
        values: Arc<dyn KpiValueRepository>,
        work_items: Arc<dyn WorkItemRepository>,
        registry: CalculatorRegistry,
    ) -> Self {
        Self {
            metrics,
            values,
            work_items,
            registry,
        }
    }

    pub fn metrics(&self) -> &Arc<dyn KpiMetricRepository> {
        &self.metrics
    }

    pub fn values(&self) -> &Arc<dyn KpiValueRepository> {
        &self.values
    }

    pub fn work_items(&self) -> &Arc<dyn WorkItemRepository> {
        &self.work_items
    }

    pub async fn find_metric(&self, id: &KpiMetricId) -> Result<KpiMetric, KpiError> {
        self.metrics
            .find_by_id(id)
            .await?
            .ok_or(KpiError::MetricNotFound(*id))
    }

    pub async fn load_project(&self, id: &ProjectId) -> Result<ProjectHierarchy, KpiError> {
        self.work_items
            .load_hierarchy(id)
            .await?
            .ok_or(KpiError::ProjectNotFound(*id))
    }

    /// Measures `metric` for a loaded project. `Ok(None)` when the metric
    /// has no formula.
    pub fn calculate(
        &self,
        metric: &KpiMetric,
        project: &ProjectHierarchy,
    ) -> Result<Option<f64>, KpiError> {
        self.registry.calculate(metric, project)
    }

    /// Loads metric and project, then measures.
    pub async fn calculate_kpi_value(
        &self,
        metric_id: &KpiMetricId,
        project_id: &ProjectId,
    ) -> Result<Option<f64>, KpiError> {
        let metric = self.find_metric(metric_id).await?;
        let project = self.load_project(project_id).await?;
        self.calculate(&metric, &project)
    }

    /// Appends a value, fixing its breach flags from the metric's thresholds.
    pub async fn record(
        &self,
        metric: &KpiMetric,
        project_id: ProjectId,
        value: f64,
        measured_at: Timestamp,
        comment: Option<String>,
    ) -> Result<KpiValue, KpiError> {
        let kpi_value = KpiValue::record(metric, project_id, value, measured_at, comment)?;
        self.values.append(&kpi_value).await?;

        if let Some(severity) = kpi_value.severity() {
            tracing::info!(
                metric_code = %metric.code(),
                project_id = %project_id,
                value,
                %severity,
                "KPI value recorded with threshold breach"
            );
        } else {
            tracing::debug!(
                metric_code = %metric.code(),
                project_id = %project_id,
                value,
                "KPI value recorded"
            );
        }
        Ok(kpi_value)
    }

    /// Records a caller-supplied value.
    ///
    /// # Errors
    ///
    /// - `MetricNotFound` / `ProjectNotFound` if either is absent
    /// - `Validation` if the value is not finite
    pub async fn record_kpi_value(&self, cmd: RecordKpiValueCommand) -> Result<KpiValue, KpiError> {
        let metric = self.find_metric(&cmd.metric_id).await?;
        self.work_items
            .find_project(&cmd.project_id)
            .await?
            .ok_or(KpiError::ProjectNotFound(cmd.project_id))?;

        self.record(
            &metric,
            cmd.project_id,
            cmd.value,
            cmd.measured_at.unwrap_or_else(Timestamp::now),
            cmd.comment,
        )
        .await
    }
}
