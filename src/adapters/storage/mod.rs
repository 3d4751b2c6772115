//! Storage Adapters
//!
//! In-memory implementations of the storage ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryWorkItemStore** - Projects, plannings, actions, sub-actions, phases, budgets
//! - **InMemoryDependencyStore** - Action dependency edges
//! - **InMemoryKpiMetricStore** - KPI definitions, unique by code
//! - **InMemoryKpiValueStore** - Append-only KPI values
//!
//! ## Usage
//!
//! ```ignore
//! use portfolio_pulse::adapters::storage::InMemoryWorkItemStore;
//!
//! let work_items = Arc::new(InMemoryWorkItemStore::new());
//! ```

mod in_memory_dependencies;
mod in_memory_kpi;
mod in_memory_work_items;
mod table;

pub use in_memory_dependencies::InMemoryDependencyStore;
pub use in_memory_kpi::{InMemoryKpiMetricStore, InMemoryKpiValueStore};
pub use in_memory_work_items::InMemoryWorkItemStore;
