//! In-memory event bus.
//!
//! Captures every published envelope for later inspection. Used by tests
//! and as the capture sink in local runs.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus with event capture and optional failure injection.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("kpi.threshold_breached.v1"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
    rejected_aggregates: Mutex<HashSet<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        lock(&self.published).clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Clears all published events.
    pub fn clear(&self) {
        lock(&self.published).clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        lock(&self.published).len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        lock(&self.published)
            .iter()
            .any(|e| e.event_type == event_type)
    }

    /// Makes publishing fail for events of this aggregate until
    /// [`InMemoryEventBus::accept_aggregate`] is called.
    pub fn reject_aggregate(&self, aggregate_id: impl Into<String>) {
        lock(&self.rejected_aggregates).insert(aggregate_id.into());
    }

    pub fn accept_aggregate(&self, aggregate_id: &str) {
        lock(&self.rejected_aggregates).remove(aggregate_id);
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if lock(&self.rejected_aggregates).contains(&event.aggregate_id) {
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                format!("Delivery rejected for aggregate {}", event.aggregate_id),
            )
            .with_detail("event_type", event.event_type));
        }

        lock(&self.published).push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, aggregate_id, "Test", json!({}))
    }

    #[tokio::test]
    async fn publish_stores_event() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("test.event", "agg-1")).await.unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event("test.event"));
    }

    #[tokio::test]
    async fn filters_by_type_and_aggregate() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("type.a", "1")).await.unwrap();
        bus.publish(test_envelope("type.b", "2")).await.unwrap();
        bus.publish(test_envelope("type.a", "2")).await.unwrap();

        assert_eq!(bus.events_of_type("type.a").len(), 2);
        assert_eq!(bus.events_for_aggregate("2").len(), 2);
    }

    #[tokio::test]
    async fn publish_all_keeps_order() {
        let bus = InMemoryEventBus::new();
        bus.publish_all(vec![
            test_envelope("type.a", "1"),
            test_envelope("type.b", "2"),
        ])
        .await
        .unwrap();

        let types: Vec<String> = bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(types, vec!["type.a", "type.b"]);
    }

    #[tokio::test]
    async fn rejected_aggregates_fail_until_accepted() {
        let bus = InMemoryEventBus::new();
        bus.reject_aggregate("agg-1");

        let err = bus
            .publish(test_envelope("test.event", "agg-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationError);
        assert_eq!(bus.event_count(), 0);

        bus.accept_aggregate("agg-1");
        bus.publish(test_envelope("test.event", "agg-1")).await.unwrap();
        assert_eq!(bus.event_count(), 1);
    }

    #[tokio::test]
    async fn clear_removes_all_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("test.event", "1")).await.unwrap();
        bus.clear();
        assert_eq!(bus.event_count(), 0);
    }
}
