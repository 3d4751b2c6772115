//! KpiMetric - definition of a measurable indicator.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditInfo, KpiMetricId, PhaseId, ValidationError};

const MAX_CODE_LENGTH: usize = 64;

/// Warning and critical limits for a metric. Either may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning: Option<f64>,
    pub critical: Option<f64>,
}

impl Thresholds {
    pub fn new(warning: Option<f64>, critical: Option<f64>) -> Self {
        Self { warning, critical }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// A KPI definition. Values are recorded against it per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMetric {
    id: KpiMetricId,
    code: String,
    name: String,
    description: Option<String>,
    unit: Option<String>,
    thresholds: Thresholds,
    higher_is_better: bool,
    formula: Option<String>,
    update_frequency_minutes: Option<i64>,
    notifications_enabled: bool,
    phase_id: Option<PhaseId>,
    audit: AuditInfo,
}

impl KpiMetric {
    /// Creates an active metric with no thresholds, no formula and
    /// notifications enabled.
    ///
    /// `code` is trimmed and upper-cased; it selects the calculator.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if code or name is blank
    /// - `InvalidFormat` if the code contains anything but `A-Z`, `0-9` or `_`
    pub fn new(code: impl AsRef<str>, name: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }
        if code.len() > MAX_CODE_LENGTH
            || !code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "code",
                "expected at most 64 characters of A-Z, 0-9 or _",
            ));
        }

        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            id: KpiMetricId::new(),
            code,
            name: name.trim().to_string(),
            description: None,
            unit: None,
            thresholds: Thresholds::none(),
            higher_is_better: true,
            formula: None,
            update_frequency_minutes: None,
            notifications_enabled: true,
            phase_id: None,
            audit: AuditInfo::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_thresholds(mut self, warning: Option<f64>, critical: Option<f64>) -> Self {
        self.thresholds = Thresholds::new(warning, critical);
        self
    }

    pub fn with_higher_is_better(mut self, higher_is_better: bool) -> Self {
        self.higher_is_better = higher_is_better;
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_update_frequency(mut self, minutes: i64) -> Self {
        self.update_frequency_minutes = Some(minutes);
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn with_phase(mut self, phase_id: PhaseId) -> Self {
        self.phase_id = Some(phase_id);
        self
    }

    pub fn id(&self) -> &KpiMetricId {
        &self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn higher_is_better(&self) -> bool {
        self.higher_is_better
    }

    /// The formula text, `None` when unset or blank.
    pub fn formula(&self) -> Option<&str> {
        self.formula
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    pub fn update_frequency_minutes(&self) -> Option<i64> {
        self.update_frequency_minutes
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn phase_id(&self) -> Option<&PhaseId> {
        self.phase_id.as_ref()
    }

    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    pub fn is_active(&self) -> bool {
        self.audit.active
    }

    pub fn deactivate(&mut self) {
        self.audit.deactivate();
    }

    /// Active with a positive update frequency.
    pub fn requires_automatic_update(&self) -> bool {
        self.is_active() && matches!(self.update_frequency_minutes, Some(m) if m > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_normalized() {
        let metric = KpiMetric::new("  completion_rate ", "Completion").unwrap();
        assert_eq!(metric.code(), "COMPLETION_RATE");
    }

    #[test]
    fn rejects_blank_and_malformed_codes() {
        assert!(matches!(
            KpiMetric::new("  ", "x"),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(matches!(
            KpiMetric::new("bad-code", "x"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(KpiMetric::new("OK", " ").is_err());
    }

    #[test]
    fn blank_formula_reads_as_none() {
        let metric = KpiMetric::new("X", "x").unwrap().with_formula("   ");
        assert_eq!(metric.formula(), None);

        let metric = metric.with_formula(" progress * 2 ");
        assert_eq!(metric.formula(), Some("progress * 2"));
    }

    #[test]
    fn automatic_update_needs_positive_frequency_and_active() {
        let base = KpiMetric::new("X", "x").unwrap();
        assert!(!base.requires_automatic_update());
        assert!(!base.clone().with_update_frequency(0).requires_automatic_update());
        assert!(!base.clone().with_update_frequency(-5).requires_automatic_update());

        let mut hourly = base.with_update_frequency(60);
        assert!(hourly.requires_automatic_update());
        hourly.deactivate();
        assert!(!hourly.requires_automatic_update());
    }
}
