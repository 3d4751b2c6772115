//! CheckThresholdsHandler - publishes one notification per breached value.
//!
//! A value is marked notified only after its notification was accepted by
//! the publisher, so a failed delivery is retried on the next run. Runs are
//! serialized; two overlapping checks never publish the same value twice.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::foundation::{
    DomainError, ErrorCode, KpiMetricId, ProjectId, SerializableDomainEvent,
};
use crate::domain::kpi::{KpiMetric, KpiThresholdBreached, KpiValue};
use crate::ports::{EventPublisher, KpiMetricRepository, KpiValueRepository, WorkItemRepository};

/// Outcome counts of one threshold check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationReport {
    /// Unnotified breached values found.
    pub examined: usize,
    pub notified: usize,
    /// Marked notified without publishing; the metric has notifications off.
    pub suppressed: usize,
    /// Left unnotified for the next run.
    pub failed: usize,
}

enum Delivery {
    Notified,
    Suppressed,
}

pub struct CheckThresholdsHandler {
    values: Arc<dyn KpiValueRepository>,
    metrics: Arc<dyn KpiMetricRepository>,
    work_items: Arc<dyn WorkItemRepository>,
    publisher: Arc<dyn EventPublisher>,
    run_lock: Mutex<()>,
}

impl CheckThresholdsHandler {
    pub fn new(
        values: Arc<dyn KpiValueRepository>,
        metrics: Arc<dyn KpiMetricRepository>,
        work_items: Arc<dyn WorkItemRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            values,
            metrics,
            work_items,
            publisher,
            run_lock: Mutex::new(()),
        }
    }

    /// # Errors
    ///
    /// Only when the unnotified breaches cannot be listed. Failures on a
    /// single value are logged and counted.
    pub async fn handle(&self) -> Result<NotificationReport, DomainError> {
        let _guard = self.run_lock.lock().await;

        let pending = self.values.find_unnotified_breaches().await?;
        let mut report = NotificationReport {
            examined: pending.len(),
            ..Default::default()
        };

        let mut metrics: HashMap<KpiMetricId, Arc<KpiMetric>> = HashMap::new();
        let mut project_names: HashMap<ProjectId, String> = HashMap::new();

        for value in &pending {
            match self.deliver(value, &mut metrics, &mut project_names).await {
                Ok(Delivery::Notified) => report.notified += 1,
                Ok(Delivery::Suppressed) => report.suppressed += 1,
                Err(e) => {
                    tracing::warn!(
                        kpi_value_id = %value.id(),
                        metric_id = %value.metric_id(),
                        project_id = %value.project_id(),
                        error = %e,
                        "threshold notification failed, will retry"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.examined > 0 {
            tracing::info!(
                examined = report.examined,
                notified = report.notified,
                suppressed = report.suppressed,
                failed = report.failed,
                "threshold check finished"
            );
        }
        Ok(report)
    }

    async fn deliver(
        &self,
        value: &KpiValue,
        metrics: &mut HashMap<KpiMetricId, Arc<KpiMetric>>,
        project_names: &mut HashMap<ProjectId, String>,
    ) -> Result<Delivery, DomainError> {
        let metric = match metrics.get(value.metric_id()) {
            Some(metric) => metric.clone(),
            None => {
                let metric = self
                    .metrics
                    .find_by_id(value.metric_id())
                    .await?
                    .map(Arc::new)
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::MetricNotFound,
                            format!("Metric {} not found", value.metric_id()),
                        )
                    })?;
                metrics.insert(*value.metric_id(), metric.clone());
                metric
            }
        };

        if !metric.notifications_enabled() {
            self.values.mark_notified(value.id()).await?;
            return Ok(Delivery::Suppressed);
        }

        let project_name = match project_names.get(value.project_id()) {
            Some(name) => name.clone(),
            None => {
                let name = self
                    .work_items
                    .find_project(value.project_id())
                    .await?
                    .map(|project| project.name().to_string())
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::ProjectNotFound,
                            format!("Project {} not found", value.project_id()),
                        )
                    })?;
                project_names.insert(*value.project_id(), name.clone());
                name
            }
        };

        let Some(event) = KpiThresholdBreached::from_value(value, &metric, project_name) else {
            self.values.mark_notified(value.id()).await?;
            return Ok(Delivery::Suppressed);
        };

        self.publisher.publish(event.to_envelope()?).await?;
        self.values.mark_notified(value.id()).await?;

        tracing::debug!(
            kpi_value_id = %value.id(),
            severity = %event.severity,
            "threshold notification published"
        );
        Ok(Delivery::Notified)
    }
}
