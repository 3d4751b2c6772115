//! Seeded in-memory work items for handler tests.

use std::sync::Arc;

use crate::adapters::storage::InMemoryWorkItemStore;
use crate::domain::foundation::Timestamp;
use crate::domain::work::{Action, Phase, Planning, Project, ProjectBudget, SubAction};
use crate::ports::WorkItemRepository;

pub struct Seed {
    pub store: Arc<InMemoryWorkItemStore>,
    pub project: Project,
    pub phase: Phase,
}

impl Seed {
    pub async fn new(project_name: &str) -> Self {
        Self::in_store(Arc::new(InMemoryWorkItemStore::new()), project_name).await
    }

    /// Adds another project to an existing store.
    pub async fn in_store(store: Arc<InMemoryWorkItemStore>, project_name: &str) -> Self {
        let project = Project::new(project_name).unwrap();
        let phase = Phase::new("Execution", 1.0, 1).unwrap();
        store.save_project(&project).await.unwrap();
        store.save_phase(&phase).await.unwrap();
        Self {
            store,
            project,
            phase,
        }
    }

    pub async fn planning(&self, name: &str) -> Planning {
        let planning = Planning::new(*self.project.id(), *self.phase.id(), name).unwrap();
        self.store.save_planning(&planning).await.unwrap();
        planning
    }

    pub async fn leaf_action(&self, planning: &Planning, name: &str, progress: Option<f64>) -> Action {
        let mut action = Action::new(*planning.id(), name).unwrap();
        if let Some(value) = progress {
            action = action.with_stored_progress(value);
        }
        self.store.save_action(&action).await.unwrap();
        action
    }

    /// An action with `done` finished and `open` unfinished sub-actions.
    pub async fn action_with_subs(
        &self,
        planning: &Planning,
        name: &str,
        done: usize,
        open: usize,
    ) -> (Action, Vec<SubAction>) {
        let action = Action::new(*planning.id(), name).unwrap();
        self.store.save_action(&action).await.unwrap();

        let mut subs = Vec::new();
        for i in 0..done + open {
            let mut sub = SubAction::new(*action.id(), format!("{name}-{i}")).unwrap();
            if i < done {
                sub = sub.completed_at(Timestamp::now());
            }
            self.store.save_sub_action(&sub).await.unwrap();
            subs.push(sub);
        }
        (action, subs)
    }

    pub async fn budget(&self, initial: Option<f64>, consumed: Option<f64>) -> ProjectBudget {
        let budget = ProjectBudget::new(*self.project.id(), initial, consumed).unwrap();
        self.store.save_budget(&budget).await.unwrap();
        budget
    }
}
