//! In-Memory KPI Stores
//!
//! Metric definitions and the append-only value log.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, ErrorCode, KpiMetricId, KpiValueId, ProjectId, Timestamp,
};
use crate::domain::kpi::{KpiMetric, KpiValue};
use crate::ports::{KpiMetricRepository, KpiValueRepository};

use super::table::Table;

/// In-memory storage for KPI definitions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKpiMetricStore {
    metrics: Arc<RwLock<Table<KpiMetricId, KpiMetric>>>,
}

impl InMemoryKpiMetricStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KpiMetricRepository for InMemoryKpiMetricStore {
    async fn save(&self, metric: &KpiMetric) -> Result<(), DomainError> {
        let mut metrics = self.metrics.write().await;
        let clash = metrics
            .select(|m| m.code() == metric.code() && m.id() != metric.id())
            .into_iter()
            .next();
        if let Some(existing) = clash {
            return Err(DomainError::new(
                ErrorCode::InvalidArgument,
                format!("KPI code already in use: {}", existing.code()),
            ));
        }
        metrics.upsert(*metric.id(), metric.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &KpiMetricId) -> Result<Option<KpiMetric>, DomainError> {
        Ok(self.metrics.read().await.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<KpiMetric>, DomainError> {
        let code = code.trim().to_ascii_uppercase();
        Ok(self
            .metrics
            .read()
            .await
            .select(|m| m.code() == code)
            .into_iter()
            .next())
    }

    async fn find_active(&self) -> Result<Vec<KpiMetric>, DomainError> {
        let mut active = self.metrics.read().await.select(KpiMetric::is_active);
        active.sort_by(|a, b| a.code().cmp(b.code()));
        Ok(active)
    }
}

/// In-memory append-only storage for KPI values.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKpiValueStore {
    values: Arc<RwLock<Table<KpiValueId, KpiValue>>>,
}

impl InMemoryKpiValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn value_count(&self) -> usize {
        self.values.read().await.len()
    }

    /// Every stored value, oldest first (useful for tests).
    pub async fn all(&self) -> Vec<KpiValue> {
        self.values.read().await.select(|_| true)
    }
}

#[async_trait]
impl KpiValueRepository for InMemoryKpiValueStore {
    async fn append(&self, value: &KpiValue) -> Result<(), DomainError> {
        let mut values = self.values.write().await;
        if values.contains(value.id()) {
            return Err(DomainError::new(
                ErrorCode::InvalidArgument,
                format!("KPI value already recorded: {}", value.id()),
            ));
        }
        values.upsert(*value.id(), value.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &KpiValueId) -> Result<Option<KpiValue>, DomainError> {
        Ok(self.values.read().await.get(id).cloned())
    }

    async fn find_unnotified_breaches(&self) -> Result<Vec<KpiValue>, DomainError> {
        Ok(self
            .values
            .read()
            .await
            .select(KpiValue::awaits_notification))
    }

    async fn mark_notified(&self, id: &KpiValueId) -> Result<bool, DomainError> {
        self.values
            .write()
            .await
            .get_mut(id)
            .map(KpiValue::mark_notified)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("KPI value not found: {}", id),
                )
            })
    }

    async fn find_latest(
        &self,
        metric_id: &KpiMetricId,
        project_id: &ProjectId,
    ) -> Result<Option<KpiValue>, DomainError> {
        Ok(self
            .values
            .read()
            .await
            .select(|v| v.metric_id() == metric_id && v.project_id() == project_id)
            .into_iter()
            .max_by_key(|v| *v.measured_at()))
    }

    async fn find_latest_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<KpiValue>, DomainError> {
        let values = self
            .values
            .read()
            .await
            .select(|v| v.project_id() == project_id);

        let mut latest: HashMap<KpiMetricId, KpiValue> = HashMap::new();
        for value in values {
            match latest.get(value.metric_id()) {
                Some(current) if current.measured_at() > value.measured_at() => {}
                _ => {
                    latest.insert(*value.metric_id(), value);
                }
            }
        }

        let mut result: Vec<KpiValue> = latest.into_values().collect();
        result.sort_by_key(|v| *v.measured_at());
        Ok(result)
    }

    async fn find_in_range(
        &self,
        project_id: &ProjectId,
        start: &Timestamp,
        end: &Timestamp,
    ) -> Result<Vec<KpiValue>, DomainError> {
        let mut values = self.values.read().await.select(|v| {
            v.project_id() == project_id && v.measured_at().is_within(start, end)
        });
        values.sort_by_key(|v| *v.measured_at());
        Ok(values)
    }
}
