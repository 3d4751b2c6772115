//! KPI metric repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, KpiMetricId, PhaseId};
use crate::domain::kpi::KpiMetric;

#[async_trait]
pub trait KpiMetricRepository: Send + Sync {
    /// Insert or replace.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if another metric already uses the code
    async fn save(&self, metric: &KpiMetric) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &KpiMetricId) -> Result<Option<KpiMetric>, DomainError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<KpiMetric>, DomainError>;

    /// Active metrics ordered by code.
    async fn find_active(&self) -> Result<Vec<KpiMetric>, DomainError>;

    /// Active metrics with a positive update frequency.
    async fn find_requiring_update(&self) -> Result<Vec<KpiMetric>, DomainError> {
        Ok(self
            .find_active()
            .await?
            .into_iter()
            .filter(KpiMetric::requires_automatic_update)
            .collect())
    }

    /// Active metrics with notifications enabled.
    async fn find_with_notifications(&self) -> Result<Vec<KpiMetric>, DomainError> {
        Ok(self
            .find_active()
            .await?
            .into_iter()
            .filter(KpiMetric::notifications_enabled)
            .collect())
    }

    /// Active metrics attached to a phase.
    async fn find_by_phase(&self, phase_id: &PhaseId) -> Result<Vec<KpiMetric>, DomainError> {
        Ok(self
            .find_active()
            .await?
            .into_iter()
            .filter(|m| m.phase_id() == Some(phase_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_metric_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn KpiMetricRepository) {}
    }
}
