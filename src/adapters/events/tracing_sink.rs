//! Notification sink that writes each threshold breach to the log.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::domain::kpi::{KpiThresholdBreached, Severity};
use crate::ports::EventPublisher;

const THRESHOLD_BREACHED: &str = "kpi.threshold_breached.v1";

/// Emits one structured log line per notification.
///
/// Critical breaches log at `error`, warnings at `warn`. Other event types
/// are logged at `debug` and otherwise ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingNotificationSink {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if event.event_type != THRESHOLD_BREACHED {
            tracing::debug!(
                event_type = %event.event_type,
                aggregate_id = %event.aggregate_id,
                "event published"
            );
            return Ok(());
        }

        let breach: KpiThresholdBreached = event.payload_as().map_err(|e| {
            DomainError::new(
                ErrorCode::NotificationError,
                format!("Malformed {} payload: {}", THRESHOLD_BREACHED, e),
            )
        })?;

        match breach.severity {
            Severity::Critical => tracing::error!(
                level = %breach.severity,
                project = %breach.project_name,
                metric = %breach.metric_name,
                value = breach.value,
                kpi_value_id = %breach.kpi_value_id,
                "KPI threshold breach notification"
            ),
            Severity::Warning => tracing::warn!(
                level = %breach.severity,
                project = %breach.project_name,
                metric = %breach.metric_name,
                value = breach.value,
                kpi_value_id = %breach.kpi_value_id,
                "KPI threshold breach notification"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ProjectId, SerializableDomainEvent, Timestamp};
    use crate::domain::kpi::{KpiMetric, KpiValue};
    use serde_json::json;

    #[tokio::test]
    async fn accepts_breach_notifications() {
        let metric = KpiMetric::new("M", "Metric")
            .unwrap()
            .with_thresholds(None, Some(10.0));
        let value = KpiValue::record(&metric, ProjectId::new(), 1.0, Timestamp::now(), None).unwrap();
        let envelope = KpiThresholdBreached::from_value(&value, &metric, "Apollo")
            .unwrap()
            .to_envelope()
            .unwrap();

        assert!(TracingNotificationSink::new().publish(envelope).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_malformed_breach_payload() {
        let envelope = EventEnvelope::new(THRESHOLD_BREACHED, "x", "KpiValue", json!({"bad": 1}));
        let err = TracingNotificationSink::new()
            .publish(envelope)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationError);
    }

    #[tokio::test]
    async fn ignores_other_events() {
        let envelope = EventEnvelope::new("other.v1", "x", "Other", json!({}));
        assert!(TracingNotificationSink::new().publish(envelope).await.is_ok());
    }
}
