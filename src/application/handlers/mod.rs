//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod dependency;
pub mod kpi;
pub mod planning;
pub mod progress;

#[cfg(test)]
pub(crate) mod test_support;

pub use dependency::{ActionRemoval, DependencyGraphManager};
pub use kpi::{
    BatchReport, BatchUpdateKpiValuesCommand, BatchUpdateKpiValuesHandler, CheckThresholdsHandler,
    KpiBatchConfig, KpiEngine, KpiQueries, NotificationReport, PairFailure, RecordKpiValueCommand,
    UpdateKpisHandler,
};
pub use planning::{
    DeletePlanningCommand, DeletePlanningHandler, DeletePlanningResult,
    RemoveActionFromPlanningCommand, RemoveActionFromPlanningHandler,
};
pub use progress::{
    CompleteSubActionCommand, CompleteSubActionHandler, CompleteSubActionResult,
    GetProjectProgressHandler, GetProjectProgressQuery, SetActionProgressCommand,
    SetActionProgressHandler, UpdateActionProgressCommand, UpdateActionProgressHandler,
    UpdateActionProgressResult, UpdatePlanningProgressCommand, UpdatePlanningProgressHandler,
    UpdatePlanningProgressResult, UpdateProjectProgressCommand, UpdateProjectProgressHandler,
};
