//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to the outside world:
//! - `storage` - In-memory repositories for work items, dependencies and KPIs
//! - `events` - Event publishers (capture bus, tracing notification sink)
//! - `scheduler` - Interval-driven runner for the KPI batch jobs

pub mod events;
pub mod scheduler;
pub mod storage;

pub use events::{InMemoryEventBus, TracingNotificationSink};
pub use scheduler::{KpiScheduler, SchedulerConfig};
pub use storage::{
    InMemoryDependencyStore, InMemoryKpiMetricStore, InMemoryKpiValueStore, InMemoryWorkItemStore,
};
