//! Progress aggregation over the work hierarchy.
//!
//! - `hierarchy` - Snapshot types assembled from the store
//! - `aggregator` - Pure roll-up functions (sub-action → project)
//! - `report` - Per-level breakdown for callers and exporters

mod aggregator;
mod errors;
mod hierarchy;
mod report;

pub use aggregator::{action_progress, planning_progress, project_progress, sub_action_progress};
pub use errors::ProgressError;
pub use hierarchy::{ActionNode, PlanningNode, ProjectHierarchy};
pub use report::{ActionProgress, PlanningProgress, ProgressReport};
