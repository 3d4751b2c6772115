//! KPI calculators and the code-based dispatch registry.
//!
//! A metric is measured only when it carries a formula. Its code selects a
//! built-in calculator; codes without one fall back to the formula
//! evaluator, which reads the formula text itself.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::progress::{project_progress, ProjectHierarchy};

use super::{Formula, FormulaVariables, KpiError, KpiMetric};

pub const COMPLETION_RATE: &str = "COMPLETION_RATE";
pub const BUDGET_UTILIZATION: &str = "BUDGET_UTILIZATION";

/// Computes one metric for one project snapshot.
pub trait KpiCalculator: Send + Sync {
    fn calculate(&self, metric: &KpiMetric, project: &ProjectHierarchy) -> Result<f64, KpiError>;
}

/// Evaluates custom formula text for metrics without a built-in calculator.
pub trait FormulaEvaluator: Send + Sync {
    fn evaluate(
        &self,
        metric: &KpiMetric,
        formula: &str,
        project: &ProjectHierarchy,
    ) -> Result<f64, KpiError>;
}

/// Project completion percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionRateCalculator;

impl KpiCalculator for CompletionRateCalculator {
    fn calculate(&self, _metric: &KpiMetric, project: &ProjectHierarchy) -> Result<f64, KpiError> {
        Ok(project_progress(project).value())
    }
}

/// Consumption percentage of the first active budget, 0 without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetUtilizationCalculator;

impl KpiCalculator for BudgetUtilizationCalculator {
    fn calculate(&self, _metric: &KpiMetric, project: &ProjectHierarchy) -> Result<f64, KpiError> {
        Ok(project
            .active_budget()
            .map(|budget| budget.consumption_percentage())
            .unwrap_or(0.0))
    }
}

/// Arithmetic evaluator over [`FormulaVariables::for_project`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticFormulaEvaluator;

impl FormulaEvaluator for ArithmeticFormulaEvaluator {
    fn evaluate(
        &self,
        metric: &KpiMetric,
        formula: &str,
        project: &ProjectHierarchy,
    ) -> Result<f64, KpiError> {
        let vars = FormulaVariables::for_project(project);
        Formula::parse(formula)
            .and_then(|f| f.evaluate(&vars))
            .map_err(|source| KpiError::Formula {
                metric_code: metric.code().to_string(),
                source,
            })
    }
}

/// Maps metric codes to calculators, with a formula fallback.
#[derive(Clone)]
pub struct CalculatorRegistry {
    calculators: HashMap<String, Arc<dyn KpiCalculator>>,
    fallback: Arc<dyn FormulaEvaluator>,
}

impl CalculatorRegistry {
    /// An empty registry that sends everything to `fallback`.
    pub fn new(fallback: Arc<dyn FormulaEvaluator>) -> Self {
        Self {
            calculators: HashMap::new(),
            fallback,
        }
    }

    /// Completion rate, budget utilization and the arithmetic evaluator.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ArithmeticFormulaEvaluator))
            .register(COMPLETION_RATE, Arc::new(CompletionRateCalculator))
            .register(BUDGET_UTILIZATION, Arc::new(BudgetUtilizationCalculator))
    }

    pub fn register(mut self, code: &str, calculator: Arc<dyn KpiCalculator>) -> Self {
        self.calculators
            .insert(code.trim().to_ascii_uppercase(), calculator);
        self
    }

    pub fn has_calculator(&self, code: &str) -> bool {
        self.calculators.contains_key(code)
    }

    /// Measures `metric` for `project`.
    ///
    /// Returns `Ok(None)` when the metric has no formula.
    pub fn calculate(
        &self,
        metric: &KpiMetric,
        project: &ProjectHierarchy,
    ) -> Result<Option<f64>, KpiError> {
        let Some(formula) = metric.formula() else {
            return Ok(None);
        };

        let value = match self.calculators.get(metric.code()) {
            Some(calculator) => calculator.calculate(metric, project)?,
            None => self.fallback.evaluate(metric, formula, project)?,
        };

        if !value.is_finite() {
            return Err(KpiError::calculation(
                metric.code(),
                "calculator returned a non-finite value",
            ));
        }
        Ok(Some(value))
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut codes: Vec<&String> = self.calculators.keys().collect();
        codes.sort();
        f.debug_struct("CalculatorRegistry")
            .field("calculators", &codes)
            .finish_non_exhaustive()
    }
}
