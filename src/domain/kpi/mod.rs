//! KPI measurement and threshold evaluation.
//!
//! - `metric` - `KpiMetric` definitions and thresholds
//! - `value` - Append-only `KpiValue` with breach flags fixed at creation
//! - `calculator` - Code → calculator registry with a formula fallback
//! - `formula` - Arithmetic expressions over project variables
//! - `events` - `KpiThresholdBreached` notification event

mod calculator;
mod errors;
mod events;
mod formula;
mod metric;
mod value;

pub use calculator::{
    ArithmeticFormulaEvaluator, BudgetUtilizationCalculator, CalculatorRegistry,
    CompletionRateCalculator, FormulaEvaluator, KpiCalculator, BUDGET_UTILIZATION,
    COMPLETION_RATE,
};
pub use errors::KpiError;
pub use events::KpiThresholdBreached;
pub use formula::{Formula, FormulaError, FormulaVariables};
pub use metric::{KpiMetric, Thresholds};
pub use value::{is_breach, KpiValue, Severity};
