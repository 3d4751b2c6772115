//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events)
//! - `work` - Projects, plannings, actions, sub-actions, phases and budgets
//! - `progress` - Bottom-up completion roll-up over the work hierarchy
//! - `dependency` - Blocked-by edges between actions
//! - `kpi` - KPI metrics, values, calculators and breach events

pub mod dependency;
pub mod foundation;
pub mod kpi;
pub mod progress;
pub mod work;
