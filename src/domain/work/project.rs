//! Project entity and its budget records.
//!
//! A project is the root of the work hierarchy. It owns plannings by
//! reference (plannings carry the `project_id`), and budget records that
//! feed the budget utilization KPI.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditInfo, BudgetId, ProjectId, Timestamp, ValidationError};

/// Maximum length for a project name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Project - top-level container of plannings.
///
/// # Invariants
///
/// - `name` is non-empty and at most 255 characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    planned_start: Option<Timestamp>,
    planned_end: Option<Timestamp>,
    actual_start: Option<Timestamp>,
    actual_end: Option<Timestamp>,
    audit: AuditInfo,
}

impl Project {
    /// Creates a new active project.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `OutOfRange` if the name is blank or too long
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = validate_name(name.into())?;
        Ok(Self {
            id: ProjectId::new(),
            name,
            description: None,
            planned_start: None,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            audit: AuditInfo::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_planned_dates(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn planned_start(&self) -> Option<&Timestamp> {
        self.planned_start.as_ref()
    }

    pub fn planned_end(&self) -> Option<&Timestamp> {
        self.planned_end.as_ref()
    }

    pub fn actual_start(&self) -> Option<&Timestamp> {
        self.actual_start.as_ref()
    }

    pub fn actual_end(&self) -> Option<&Timestamp> {
        self.actual_end.as_ref()
    }

    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    pub fn is_active(&self) -> bool {
        self.audit.active
    }

    /// Marks the project as started.
    pub fn start(&mut self, at: Timestamp) {
        self.actual_start = Some(at);
        self.audit.touch();
    }

    /// Marks the project as finished.
    pub fn finish(&mut self, at: Timestamp) {
        self.actual_end = Some(at);
        self.audit.touch();
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = validate_name(name.into())?;
        self.audit.touch();
        Ok(())
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            "name",
            1.0,
            MAX_NAME_LENGTH as f64,
            trimmed.chars().count() as f64,
        ));
    }
    Ok(trimmed.to_string())
}

/// Budget envelope of a project: initial allocation and amount consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBudget {
    id: BudgetId,
    project_id: ProjectId,
    initial: Option<f64>,
    consumed: Option<f64>,
    audit: AuditInfo,
}

impl ProjectBudget {
    /// Creates an active budget record.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if either amount is negative or not finite
    pub fn new(
        project_id: ProjectId,
        initial: Option<f64>,
        consumed: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_amount("initial_budget", initial)?;
        validate_amount("consumed_budget", consumed)?;
        Ok(Self {
            id: BudgetId::new(),
            project_id,
            initial,
            consumed,
            audit: AuditInfo::new(),
        })
    }

    pub fn id(&self) -> &BudgetId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn initial(&self) -> Option<f64> {
        self.initial
    }

    pub fn consumed(&self) -> Option<f64> {
        self.consumed
    }

    pub fn is_active(&self) -> bool {
        self.audit.active
    }

    pub fn deactivate(&mut self) {
        self.audit.deactivate();
    }

    /// Records additional spending.
    pub fn consume(&mut self, amount: f64) -> Result<(), ValidationError> {
        validate_amount("amount", Some(amount))?;
        self.consumed = Some(self.consumed.unwrap_or(0.0) + amount);
        self.audit.touch();
        Ok(())
    }

    /// Initial minus consumed; zero when no initial amount is set.
    pub fn remaining(&self) -> f64 {
        match self.initial {
            None => 0.0,
            Some(initial) => initial - self.consumed.unwrap_or(0.0),
        }
    }

    /// `consumed / initial * 100`, rounded to two decimals.
    ///
    /// Zero when the initial amount is missing or zero, or nothing has been
    /// consumed yet. May exceed 100 on overspend.
    pub fn consumption_percentage(&self) -> f64 {
        match (self.initial, self.consumed) {
            (Some(initial), Some(consumed)) if initial != 0.0 => {
                (consumed / initial * 10_000.0).round() / 100.0
            }
            _ => 0.0,
        }
    }

    /// True when the record can serve as a utilization baseline.
    pub fn has_usable_baseline(&self) -> bool {
        matches!(self.initial, Some(initial) if initial != 0.0)
    }
}

fn validate_amount(field: &str, amount: Option<f64>) -> Result<(), ValidationError> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => Err(ValidationError::out_of_range(
            field,
            0.0,
            f64::MAX,
            value,
        )),
        _ => Ok(()),
    }
}
