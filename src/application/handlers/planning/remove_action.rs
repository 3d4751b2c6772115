//! RemoveActionFromPlanningHandler - Command handler for deleting an action
//! out of its planning.

use std::sync::Arc;

use crate::application::handlers::dependency::DependencyGraphManager;
use crate::domain::foundation::{ActionId, PlanningId};
use crate::domain::progress::ProgressError;
use crate::ports::WorkItemRepository;

#[derive(Debug, Clone)]
pub struct RemoveActionFromPlanningCommand {
    pub planning_id: PlanningId,
    pub action_id: ActionId,
}

/// Deletes the action, its sub-actions and every dependency edge touching it.
pub struct RemoveActionFromPlanningHandler {
    work_items: Arc<dyn WorkItemRepository>,
    dependencies: Arc<DependencyGraphManager>,
}

impl RemoveActionFromPlanningHandler {
    pub fn new(
        work_items: Arc<dyn WorkItemRepository>,
        dependencies: Arc<DependencyGraphManager>,
    ) -> Self {
        Self {
            work_items,
            dependencies,
        }
    }

    pub async fn handle(&self, cmd: RemoveActionFromPlanningCommand) -> Result<(), ProgressError> {
        let mut planning = self
            .work_items
            .find_planning(&cmd.planning_id)
            .await?
            .ok_or(ProgressError::PlanningNotFound(cmd.planning_id))?;

        let action = self
            .work_items
            .find_action(&cmd.action_id)
            .await?
            .ok_or(ProgressError::ActionNotFound(cmd.action_id))?;

        if action.planning_id() != &cmd.planning_id {
            return Err(ProgressError::ActionNotInPlanning {
                action_id: cmd.action_id,
                planning_id: cmd.planning_id,
            });
        }

        let (work_items, action_id) = (self.work_items.clone(), cmd.action_id);
        self.dependencies
            .remove_actions_with(&[cmd.action_id], move || async move {
                work_items
                    .delete_action(&action_id)
                    .await
                    .map(|()| vec![action_id])
            })
            .await
            .map_err(|e| ProgressError::Infrastructure(e.to_string()))?;

        planning.touch();
        self.work_items.save_planning(&planning).await?;

        tracing::info!(
            planning_id = %cmd.planning_id,
            action_id = %cmd.action_id,
            "action removed from planning"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDependencyStore;
    use crate::application::handlers::test_support::Seed;
    use crate::domain::foundation::ErrorCategory;

    fn handler(seed: &Seed) -> (RemoveActionFromPlanningHandler, Arc<DependencyGraphManager>) {
        let manager = Arc::new(DependencyGraphManager::new(
            Arc::new(InMemoryDependencyStore::new()),
            seed.store.clone(),
        ));
        (
            RemoveActionFromPlanningHandler::new(seed.store.clone(), manager.clone()),
            manager,
        )
    }

    #[tokio::test]
    async fn removes_action_subtree_and_edges() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        let (doomed, _) = seed.action_with_subs(&planning, "doomed", 1, 1).await;
        let other = seed.leaf_action(&planning, "other", None).await;
        let (handler, manager) = handler(&seed);
        manager.add_dependency(*other.id(), *doomed.id()).await.unwrap();

        handler
            .handle(RemoveActionFromPlanningCommand {
                planning_id: *planning.id(),
                action_id: *doomed.id(),
            })
            .await
            .unwrap();

        assert!(seed.store.find_action(doomed.id()).await.unwrap().is_none());
        assert_eq!(seed.store.sub_action_count().await, 0);
        assert_eq!(manager.edge_count().await, 0);
        assert!(manager.is_ready(other.id()).await.unwrap());
    }

    #[tokio::test]
    async fn action_of_another_planning_is_invalid() {
        let seed = Seed::new("Apollo").await;
        let first = seed.planning("first").await;
        let second = seed.planning("second").await;
        let action = seed.leaf_action(&second, "a", None).await;
        let (handler, _) = handler(&seed);

        let err = handler
            .handle(RemoveActionFromPlanningCommand {
                planning_id: *first.id(),
                action_id: *action.id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::ActionNotInPlanning { .. }));
        assert_eq!(err.code().category(), ErrorCategory::InvalidArgument);
        assert!(seed.store.find_action(action.id()).await.unwrap().is_some());
    }
}
