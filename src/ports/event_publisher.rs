//! EventPublisher port - Interface for publishing domain events.
//!
//! The KPI pipeline publishes threshold notifications through this port
//! without knowing whether they end up in a log, a test buffer or a bus.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Errors are propagated to the caller, so the caller can retry later
/// - `publish_all` delivers in order
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
