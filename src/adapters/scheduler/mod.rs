//! Scheduler adapter - drives the KPI batch jobs from tokio intervals.

mod kpi_scheduler;

pub use kpi_scheduler::{KpiScheduler, SchedulerConfig};
