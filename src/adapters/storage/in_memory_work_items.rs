//! In-Memory Work Item Store
//!
//! Holds projects, plannings, actions, sub-actions, phases and budgets in
//! process memory. Used by the binary and by tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    ActionId, BudgetId, DomainError, ErrorCode, PhaseId, PlanningId, ProjectId, SubActionId,
};
use crate::domain::work::{Action, Phase, Planning, Project, ProjectBudget, SubAction};
use crate::ports::WorkItemRepository;

use super::table::Table;

#[derive(Debug, Default)]
struct Tables {
    projects: Table<ProjectId, Project>,
    phases: Table<PhaseId, Phase>,
    plannings: Table<PlanningId, Planning>,
    actions: Table<ActionId, Action>,
    sub_actions: Table<SubActionId, SubAction>,
    budgets: Table<BudgetId, ProjectBudget>,
}

impl Tables {
    fn remove_action_subtree(&mut self, action_id: &ActionId) {
        self.actions.remove(action_id);
        for sub in self.sub_actions.select(|s| s.action_id() == action_id) {
            self.sub_actions.remove(sub.id());
        }
    }
}

/// In-memory work item storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkItemStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryWorkItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn action_count(&self) -> usize {
        self.tables.read().await.actions.len()
    }

    pub async fn sub_action_count(&self) -> usize {
        self.tables.read().await.sub_actions.len()
    }
}

#[async_trait]
impl WorkItemRepository for InMemoryWorkItemStore {
    async fn save_project(&self, project: &Project) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .projects
            .upsert(*project.id(), project.clone());
        Ok(())
    }

    async fn find_project(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.tables.read().await.projects.get(id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DomainError> {
        Ok(self.tables.read().await.projects.select(Project::is_active))
    }

    async fn save_phase(&self, phase: &Phase) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .phases
            .upsert(*phase.id(), phase.clone());
        Ok(())
    }

    async fn find_phase(&self, id: &PhaseId) -> Result<Option<Phase>, DomainError> {
        Ok(self.tables.read().await.phases.get(id).cloned())
    }

    async fn save_planning(&self, planning: &Planning) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains(planning.project_id()) {
            return Err(DomainError::new(
                ErrorCode::ProjectNotFound,
                format!("Project not found: {}", planning.project_id()),
            ));
        }
        tables.plannings.upsert(*planning.id(), planning.clone());
        Ok(())
    }

    async fn find_planning(&self, id: &PlanningId) -> Result<Option<Planning>, DomainError> {
        Ok(self.tables.read().await.plannings.get(id).cloned())
    }

    async fn plannings_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Planning>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .plannings
            .select(|p| p.project_id() == project_id))
    }

    async fn save_action(&self, action: &Action) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.plannings.contains(action.planning_id()) {
            return Err(DomainError::new(
                ErrorCode::PlanningNotFound,
                format!("Planning not found: {}", action.planning_id()),
            ));
        }
        tables.actions.upsert(*action.id(), action.clone());
        Ok(())
    }

    async fn find_action(&self, id: &ActionId) -> Result<Option<Action>, DomainError> {
        Ok(self.tables.read().await.actions.get(id).cloned())
    }

    async fn actions_for_planning(
        &self,
        planning_id: &PlanningId,
    ) -> Result<Vec<Action>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .actions
            .select(|a| a.planning_id() == planning_id))
    }

    async fn save_sub_action(&self, sub_action: &SubAction) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.actions.contains(sub_action.action_id()) {
            return Err(DomainError::new(
                ErrorCode::ActionNotFound,
                format!("Action not found: {}", sub_action.action_id()),
            ));
        }
        tables
            .sub_actions
            .upsert(*sub_action.id(), sub_action.clone());
        Ok(())
    }

    async fn find_sub_action(&self, id: &SubActionId) -> Result<Option<SubAction>, DomainError> {
        Ok(self.tables.read().await.sub_actions.get(id).cloned())
    }

    async fn sub_actions_for_action(
        &self,
        action_id: &ActionId,
    ) -> Result<Vec<SubAction>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .sub_actions
            .select(|s| s.action_id() == action_id))
    }

    async fn save_budget(&self, budget: &ProjectBudget) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .budgets
            .upsert(*budget.id(), budget.clone());
        Ok(())
    }

    async fn budgets_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectBudget>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .budgets
            .select(|b| b.project_id() == project_id))
    }

    async fn delete_action(&self, id: &ActionId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.actions.contains(id) {
            return Err(DomainError::new(
                ErrorCode::ActionNotFound,
                format!("Action not found: {}", id),
            ));
        }
        tables.remove_action_subtree(id);
        Ok(())
    }

    async fn delete_planning(&self, id: &PlanningId) -> Result<Vec<ActionId>, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.plannings.remove(id).is_none() {
            return Err(DomainError::new(
                ErrorCode::PlanningNotFound,
                format!("Planning not found: {}", id),
            ));
        }

        let action_ids: Vec<ActionId> = tables
            .actions
            .select(|a| a.planning_id() == id)
            .iter()
            .map(|a| *a.id())
            .collect();
        for action_id in &action_ids {
            tables.remove_action_subtree(action_id);
        }
        Ok(action_ids)
    }
}
