//! Planning and portfolio phase entities.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuditInfo, PhaseId, PlanningId, ProjectId, ValidationError};

/// A named weighting bucket that plannings and KPI metrics can be attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    name: String,
    weight: f64,
    position: u32,
    audit: AuditInfo,
}

impl Phase {
    /// Creates a phase. Weight must be finite and non-negative.
    pub fn new(name: impl Into<String>, weight: f64, position: u32) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::out_of_range("weight", 0.0, f64::MAX, weight));
        }
        Ok(Self {
            id: PhaseId::new(),
            name,
            weight,
            position,
            audit: AuditInfo::new(),
        })
    }

    pub fn id(&self) -> &PhaseId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.audit.active
    }
}

/// Grouping of actions for one project within one phase.
///
/// Plannings own their actions: deleting a planning deletes its actions,
/// their sub-actions and every dependency edge touching those actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planning {
    id: PlanningId,
    project_id: ProjectId,
    phase_id: PhaseId,
    name: String,
    audit: AuditInfo,
}

impl Planning {
    pub fn new(
        project_id: ProjectId,
        phase_id: PhaseId,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: PlanningId::new(),
            project_id,
            phase_id,
            name,
            audit: AuditInfo::new(),
        })
    }

    pub fn id(&self) -> &PlanningId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn phase_id(&self) -> &PhaseId {
        &self.phase_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// Refreshes the modification stamp after its actions changed.
    pub fn touch(&mut self) {
        self.audit.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_rejects_negative_weight() {
        assert!(Phase::new("Build", -1.0, 1).is_err());
        assert!(Phase::new("Build", f64::INFINITY, 1).is_err());
        assert!(Phase::new("Build", 0.25, 1).is_ok());
    }

    #[test]
    fn planning_keeps_parent_references() {
        let project_id = ProjectId::new();
        let phase_id = PhaseId::new();
        let planning = Planning::new(project_id, phase_id, "Delivery").unwrap();

        assert_eq!(planning.project_id(), &project_id);
        assert_eq!(planning.phase_id(), &phase_id);
    }

    #[test]
    fn planning_rejects_blank_name() {
        assert!(Planning::new(ProjectId::new(), PhaseId::new(), "").is_err());
    }
}
