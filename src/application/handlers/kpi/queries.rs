//! Read-side KPI queries.

use std::sync::Arc;

use crate::domain::foundation::{PhaseId, ProjectId, Timestamp};
use crate::domain::kpi::{KpiError, KpiMetric, KpiValue};
use crate::ports::{KpiMetricRepository, KpiValueRepository, WorkItemRepository};

pub struct KpiQueries {
    metrics: Arc<dyn KpiMetricRepository>,
    values: Arc<dyn KpiValueRepository>,
    work_items: Arc<dyn WorkItemRepository>,
}

impl KpiQueries {
    pub fn new(
        metrics: Arc<dyn KpiMetricRepository>,
        values: Arc<dyn KpiValueRepository>,
        work_items: Arc<dyn WorkItemRepository>,
    ) -> Self {
        Self {
            metrics,
            values,
            work_items,
        }
    }

    /// The most recent value of every metric measured for the project.
    pub async fn latest_values_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<KpiValue>, KpiError> {
        self.require_project(project_id).await?;
        Ok(self.values.find_latest_for_project(project_id).await?)
    }

    /// Values measured within `[start, end]`, oldest first.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `start` is after `end`
    /// - `ProjectNotFound` if the project is absent
    pub async fn values_in_range(
        &self,
        project_id: &ProjectId,
        start: &Timestamp,
        end: &Timestamp,
    ) -> Result<Vec<KpiValue>, KpiError> {
        if start.is_after(end) {
            return Err(KpiError::InvalidArgument(format!(
                "range start {} is after end {}",
                start, end
            )));
        }
        self.require_project(project_id).await?;
        Ok(self.values.find_in_range(project_id, start, end).await?)
    }

    pub async fn metrics_requiring_update(&self) -> Result<Vec<KpiMetric>, KpiError> {
        Ok(self.metrics.find_requiring_update().await?)
    }

    pub async fn metrics_with_notifications(&self) -> Result<Vec<KpiMetric>, KpiError> {
        Ok(self.metrics.find_with_notifications().await?)
    }

    pub async fn metrics_for_phase(&self, phase_id: &PhaseId) -> Result<Vec<KpiMetric>, KpiError> {
        Ok(self.metrics.find_by_phase(phase_id).await?)
    }

    async fn require_project(&self, project_id: &ProjectId) -> Result<(), KpiError> {
        self.work_items
            .find_project(project_id)
            .await?
            .map(|_| ())
            .ok_or(KpiError::ProjectNotFound(*project_id))
    }
}
