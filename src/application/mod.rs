//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change work items, dependencies or KPI values; query
//! handlers only read.

pub mod handlers;

pub use handlers::{
    // Progress
    CompleteSubActionCommand, CompleteSubActionHandler, GetProjectProgressHandler,
    GetProjectProgressQuery, SetActionProgressCommand, SetActionProgressHandler,
    UpdateActionProgressCommand, UpdateActionProgressHandler, UpdatePlanningProgressCommand,
    UpdatePlanningProgressHandler, UpdateProjectProgressCommand, UpdateProjectProgressHandler,
    // Planning structure
    DeletePlanningCommand, DeletePlanningHandler, RemoveActionFromPlanningCommand,
    RemoveActionFromPlanningHandler,
    // Dependencies
    ActionRemoval, DependencyGraphManager,
    // KPI
    BatchReport, BatchUpdateKpiValuesCommand, BatchUpdateKpiValuesHandler, CheckThresholdsHandler,
    KpiBatchConfig, KpiEngine, KpiQueries, NotificationReport, RecordKpiValueCommand,
    UpdateKpisHandler,
};
