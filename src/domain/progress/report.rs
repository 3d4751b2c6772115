//! ProgressReport value object - per-level breakdown of a project's progress.

use serde::Serialize;

use crate::domain::foundation::{ActionId, Percentage, PlanningId, ProjectId};

use super::{action_progress, planning_progress, project_progress, ProjectHierarchy};

/// Progress of a single action inside a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionProgress {
    pub action_id: ActionId,
    pub name: String,
    pub progress: Percentage,
    pub sub_action_count: usize,
    pub completed_sub_actions: usize,
}

/// Progress of a planning and its actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningProgress {
    pub planning_id: PlanningId,
    pub name: String,
    pub progress: Percentage,
    pub actions: Vec<ActionProgress>,
}

/// Snapshot of a project's progress at every level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub project_id: ProjectId,
    pub project_name: String,
    pub progress: Percentage,
    pub action_count: usize,
    pub plannings: Vec<PlanningProgress>,
}

impl ProgressReport {
    /// Computes the full breakdown for a hierarchy snapshot.
    pub fn from_hierarchy(hierarchy: &ProjectHierarchy) -> Self {
        let plannings = hierarchy
            .plannings
            .iter()
            .map(|node| PlanningProgress {
                planning_id: *node.planning.id(),
                name: node.planning.name().to_string(),
                progress: planning_progress(node),
                actions: node
                    .actions
                    .iter()
                    .map(|action| ActionProgress {
                        action_id: *action.action.id(),
                        name: action.action.name().to_string(),
                        progress: action_progress(&action.action, &action.sub_actions),
                        sub_action_count: action.sub_actions.len(),
                        completed_sub_actions: action.completed_sub_actions(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            project_id: *hierarchy.project.id(),
            project_name: hierarchy.project.name().to_string(),
            progress: project_progress(hierarchy),
            action_count: hierarchy.action_count(),
            plannings,
        }
    }

    pub fn planning(&self, id: &PlanningId) -> Option<&PlanningProgress> {
        self.plannings.iter().find(|p| &p.planning_id == id)
    }

    pub fn action(&self, id: &ActionId) -> Option<&ActionProgress> {
        self.plannings
            .iter()
            .flat_map(|p| p.actions.iter())
            .find(|a| &a.action_id == id)
    }
}
