//! KPI handlers - measurement, batch runs, threshold notification, queries.

mod check_thresholds;
mod engine;
mod queries;
mod update_kpis;

pub use check_thresholds::{CheckThresholdsHandler, NotificationReport};
pub use engine::{KpiEngine, RecordKpiValueCommand};
pub use queries::KpiQueries;
pub use update_kpis::{
    BatchReport, BatchUpdateKpiValuesCommand, BatchUpdateKpiValuesHandler, KpiBatchConfig,
    PairFailure, UpdateKpisHandler,
};
