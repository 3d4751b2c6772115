//! Work item repository port.
//!
//! Persists the project → planning → action → sub-action tree together with
//! phases and project budgets. `save_*` methods insert or replace.

use async_trait::async_trait;

use crate::domain::foundation::{
    ActionId, DomainError, PhaseId, PlanningId, ProjectId, SubActionId,
};
use crate::domain::progress::{ActionNode, PlanningNode, ProjectHierarchy};
use crate::domain::work::{Action, Phase, Planning, Project, ProjectBudget, SubAction};

#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    async fn save_project(&self, project: &Project) -> Result<(), DomainError>;

    async fn find_project(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Active projects, oldest first.
    async fn list_projects(&self) -> Result<Vec<Project>, DomainError>;

    async fn save_phase(&self, phase: &Phase) -> Result<(), DomainError>;

    async fn find_phase(&self, id: &PhaseId) -> Result<Option<Phase>, DomainError>;

    async fn save_planning(&self, planning: &Planning) -> Result<(), DomainError>;

    async fn find_planning(&self, id: &PlanningId) -> Result<Option<Planning>, DomainError>;

    /// Plannings of a project, oldest first.
    async fn plannings_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Planning>, DomainError>;

    async fn save_action(&self, action: &Action) -> Result<(), DomainError>;

    async fn find_action(&self, id: &ActionId) -> Result<Option<Action>, DomainError>;

    /// Actions of a planning, oldest first.
    async fn actions_for_planning(
        &self,
        planning_id: &PlanningId,
    ) -> Result<Vec<Action>, DomainError>;

    async fn save_sub_action(&self, sub_action: &SubAction) -> Result<(), DomainError>;

    async fn find_sub_action(&self, id: &SubActionId) -> Result<Option<SubAction>, DomainError>;

    /// Sub-actions of an action, oldest first.
    async fn sub_actions_for_action(
        &self,
        action_id: &ActionId,
    ) -> Result<Vec<SubAction>, DomainError>;

    async fn save_budget(&self, budget: &ProjectBudget) -> Result<(), DomainError>;

    /// Budget records of a project in insertion order.
    async fn budgets_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectBudget>, DomainError>;

    /// Deletes an action and its sub-actions.
    ///
    /// # Errors
    ///
    /// - `ActionNotFound` if the action doesn't exist
    async fn delete_action(&self, id: &ActionId) -> Result<(), DomainError>;

    /// Deletes a planning with its actions and their sub-actions.
    ///
    /// Returns the ids of the deleted actions.
    ///
    /// # Errors
    ///
    /// - `PlanningNotFound` if the planning doesn't exist
    async fn delete_planning(&self, id: &PlanningId) -> Result<Vec<ActionId>, DomainError>;

    /// Assembles the full subtree of a project. `None` if the project is absent.
    async fn load_hierarchy(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<ProjectHierarchy>, DomainError> {
        let Some(project) = self.find_project(project_id).await? else {
            return Ok(None);
        };

        let mut plannings = Vec::new();
        for planning in self.plannings_for_project(project_id).await? {
            let mut actions = Vec::new();
            for action in self.actions_for_planning(planning.id()).await? {
                let sub_actions = self.sub_actions_for_action(action.id()).await?;
                actions.push(ActionNode::new(action, sub_actions));
            }
            plannings.push(PlanningNode::new(planning, actions));
        }

        let budgets = self.budgets_for_project(project_id).await?;
        Ok(Some(
            ProjectHierarchy::new(project, plannings).with_budgets(budgets),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_item_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WorkItemRepository) {}
    }
}
