//! DeletePlanningHandler - Command handler for deleting a planning with
//! everything below it.

use std::sync::Arc;

use crate::application::handlers::dependency::DependencyGraphManager;
use crate::domain::foundation::{ActionId, PlanningId};
use crate::domain::progress::ProgressError;
use crate::ports::WorkItemRepository;

#[derive(Debug, Clone)]
pub struct DeletePlanningCommand {
    pub planning_id: PlanningId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlanningResult {
    pub deleted_actions: Vec<ActionId>,
    pub detached_dependencies: usize,
}

pub struct DeletePlanningHandler {
    work_items: Arc<dyn WorkItemRepository>,
    dependencies: Arc<DependencyGraphManager>,
}

impl DeletePlanningHandler {
    pub fn new(
        work_items: Arc<dyn WorkItemRepository>,
        dependencies: Arc<DependencyGraphManager>,
    ) -> Self {
        Self {
            work_items,
            dependencies,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeletePlanningCommand,
    ) -> Result<DeletePlanningResult, ProgressError> {
        self.work_items
            .find_planning(&cmd.planning_id)
            .await?
            .ok_or(ProgressError::PlanningNotFound(cmd.planning_id))?;

        let action_ids: Vec<ActionId> = self
            .work_items
            .actions_for_planning(&cmd.planning_id)
            .await?
            .iter()
            .map(|a| *a.id())
            .collect();

        let removal = self
            .dependencies
            .remove_actions_with(&action_ids, || {
                self.work_items.delete_planning(&cmd.planning_id)
            })
            .await
            .map_err(|e| ProgressError::Infrastructure(e.to_string()))?;

        tracing::info!(
            planning_id = %cmd.planning_id,
            actions = removal.deleted_actions.len(),
            dependencies = removal.detached.len(),
            "planning deleted"
        );
        Ok(DeletePlanningResult {
            detached_dependencies: removal.detached.len(),
            deleted_actions: removal.deleted_actions,
        })
    }
}
