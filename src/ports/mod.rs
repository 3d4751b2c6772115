//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `WorkItemRepository` - Projects, plannings, actions, sub-actions, phases, budgets
//! - `DependencyRepository` - Action dependency edges
//! - `KpiMetricRepository` - KPI definitions
//! - `KpiValueRepository` - Append-only KPI measurements
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events

mod dependency_repository;
mod event_publisher;
mod kpi_metric_repository;
mod kpi_value_repository;
mod work_item_repository;

pub use dependency_repository::DependencyRepository;
pub use event_publisher::EventPublisher;
pub use kpi_metric_repository::KpiMetricRepository;
pub use kpi_value_repository::KpiValueRepository;
pub use work_item_repository::WorkItemRepository;
