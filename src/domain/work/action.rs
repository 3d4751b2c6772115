//! Action and SubAction entities.
//!
//! An action carries an explicit `progress` value that only matters while it
//! has no sub-actions. Sub-actions have no progress of their own: they are
//! either finished (an actual end date is set) or not.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ActionId, AuditInfo, Percentage, PlanningId, SubActionId, Timestamp, ValidationError,
};

/// A unit of work under a planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    id: ActionId,
    planning_id: PlanningId,
    name: String,
    description: Option<String>,
    progress: Option<f64>,
    planned_start: Option<Timestamp>,
    planned_end: Option<Timestamp>,
    actual_start: Option<Timestamp>,
    actual_end: Option<Timestamp>,
    audit: AuditInfo,
}

impl Action {
    pub fn new(planning_id: PlanningId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: ActionId::new(),
            planning_id,
            name,
            description: None,
            progress: None,
            planned_start: None,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            audit: AuditInfo::new(),
        })
    }

    /// Sets the stored progress exactly as given, without validation.
    ///
    /// Used when loading rows written by other systems; aggregation clamps.
    pub fn with_stored_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
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

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    pub fn planning_id(&self) -> &PlanningId {
        &self.planning_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The explicit leaf progress, as stored.
    pub fn progress(&self) -> Option<f64> {
        self.progress
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

    /// An action is complete once its actual end date is recorded.
    pub fn is_completed(&self) -> bool {
        self.actual_end.is_some()
    }

    /// Sets the leaf progress reported by a caller.
    pub fn set_progress(&mut self, progress: Percentage) {
        self.progress = Some(progress.value());
        self.audit.touch();
    }

    /// Stores a recomputed progress onto the denormalized column.
    pub fn record_computed_progress(&mut self, progress: Percentage) {
        self.set_progress(progress);
    }

    pub fn start(&mut self, at: Timestamp) {
        self.actual_start = Some(at);
        self.audit.touch();
    }

    pub fn complete(&mut self, at: Timestamp) {
        if self.actual_start.is_none() {
            self.actual_start = Some(at);
        }
        self.actual_end = Some(at);
        self.audit.touch();
    }

    pub fn reopen(&mut self) {
        self.actual_end = None;
        self.audit.touch();
    }
}

/// Leaf unit of work under an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAction {
    id: SubActionId,
    action_id: ActionId,
    name: String,
    planned_end: Option<Timestamp>,
    actual_end: Option<Timestamp>,
    audit: AuditInfo,
}

impl SubAction {
    pub fn new(action_id: ActionId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: SubActionId::new(),
            action_id,
            name,
            planned_end: None,
            actual_end: None,
            audit: AuditInfo::new(),
        })
    }

    /// Builder variant of [`SubAction::complete`].
    pub fn completed_at(mut self, at: Timestamp) -> Self {
        self.actual_end = Some(at);
        self
    }

    pub fn with_planned_end(mut self, at: Timestamp) -> Self {
        self.planned_end = Some(at);
        self
    }

    pub fn id(&self) -> &SubActionId {
        &self.id
    }

    pub fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn planned_end(&self) -> Option<&Timestamp> {
        self.planned_end.as_ref()
    }

    pub fn actual_end(&self) -> Option<&Timestamp> {
        self.actual_end.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.actual_end.is_some()
    }

    pub fn complete(&mut self, at: Timestamp) {
        self.actual_end = Some(at);
        self.audit.touch();
    }

    pub fn reopen(&mut self) {
        self.actual_end = None;
        self.audit.touch();
    }
}
