//! KPI value repository port.
//!
//! Values are append-only. The notified flag is the one mutable column and
//! only `mark_notified` may change it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, KpiMetricId, KpiValueId, ProjectId, Timestamp};
use crate::domain::kpi::KpiValue;

#[async_trait]
pub trait KpiValueRepository: Send + Sync {
    /// Stores a new value with its breach flags.
    async fn append(&self, value: &KpiValue) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &KpiValueId) -> Result<Option<KpiValue>, DomainError>;

    /// Breached values whose notification has not been sent, oldest first.
    async fn find_unnotified_breaches(&self) -> Result<Vec<KpiValue>, DomainError>;

    /// Sets the notified flag.
    ///
    /// Returns `false` if it was already set.
    ///
    /// # Errors
    ///
    /// - `InternalError` if no value has this id
    async fn mark_notified(&self, id: &KpiValueId) -> Result<bool, DomainError>;

    /// Most recent value of one metric for one project.
    async fn find_latest(
        &self,
        metric_id: &KpiMetricId,
        project_id: &ProjectId,
    ) -> Result<Option<KpiValue>, DomainError>;

    /// Most recent value of every metric measured for the project.
    async fn find_latest_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<KpiValue>, DomainError>;

    /// Values measured within `[start, end]`, oldest first.
    async fn find_in_range(
        &self,
        project_id: &ProjectId,
        start: &Timestamp,
        end: &Timestamp,
    ) -> Result<Vec<KpiValue>, DomainError>;
}
