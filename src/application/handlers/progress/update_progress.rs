//! Recompute-and-store handlers for the denormalized action progress.
//!
//! Each handler derives progress from sub-action completion, writes it onto
//! the action rows and returns the roll-up at the requested level.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, Percentage, PlanningId, ProjectId};
use crate::domain::progress::{action_progress, ProgressError, ProgressReport};
use crate::domain::work::Action;
use crate::ports::WorkItemRepository;

/// Recomputes one action and stores the result when it changed.
async fn refresh_action(
    work_items: &dyn WorkItemRepository,
    mut action: Action,
) -> Result<Percentage, ProgressError> {
    let sub_actions = work_items.sub_actions_for_action(action.id()).await?;
    let progress = action_progress(&action, &sub_actions);

    if !sub_actions.is_empty() && action.progress() != Some(progress.value()) {
        action.record_computed_progress(progress);
        work_items.save_action(&action).await?;
    }
    Ok(progress)
}

// === UpdateActionProgress ===

#[derive(Debug, Clone)]
pub struct UpdateActionProgressCommand {
    pub action_id: ActionId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateActionProgressResult {
    pub action_id: ActionId,
    pub progress: Percentage,
}

pub struct UpdateActionProgressHandler {
    work_items: Arc<dyn WorkItemRepository>,
}

impl UpdateActionProgressHandler {
    pub fn new(work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self { work_items }
    }

    pub async fn handle(
        &self,
        cmd: UpdateActionProgressCommand,
    ) -> Result<UpdateActionProgressResult, ProgressError> {
        let action = self
            .work_items
            .find_action(&cmd.action_id)
            .await?
            .ok_or(ProgressError::ActionNotFound(cmd.action_id))?;

        let progress = refresh_action(self.work_items.as_ref(), action).await?;
        tracing::debug!(action_id = %cmd.action_id, %progress, "action progress updated");

        Ok(UpdateActionProgressResult {
            action_id: cmd.action_id,
            progress,
        })
    }
}

// === UpdatePlanningProgress ===

#[derive(Debug, Clone)]
pub struct UpdatePlanningProgressCommand {
    pub planning_id: PlanningId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlanningProgressResult {
    pub planning_id: PlanningId,
    pub progress: Percentage,
    pub actions: Vec<UpdateActionProgressResult>,
}

pub struct UpdatePlanningProgressHandler {
    work_items: Arc<dyn WorkItemRepository>,
}

impl UpdatePlanningProgressHandler {
    pub fn new(work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self { work_items }
    }

    pub async fn handle(
        &self,
        cmd: UpdatePlanningProgressCommand,
    ) -> Result<UpdatePlanningProgressResult, ProgressError> {
        self.work_items
            .find_planning(&cmd.planning_id)
            .await?
            .ok_or(ProgressError::PlanningNotFound(cmd.planning_id))?;

        let mut actions = Vec::new();
        for action in self.work_items.actions_for_planning(&cmd.planning_id).await? {
            let action_id = *action.id();
            let progress = refresh_action(self.work_items.as_ref(), action).await?;
            actions.push(UpdateActionProgressResult {
                action_id,
                progress,
            });
        }

        let progress = Percentage::mean(actions.iter().map(|a| a.progress));
        tracing::debug!(planning_id = %cmd.planning_id, %progress, "planning progress updated");

        Ok(UpdatePlanningProgressResult {
            planning_id: cmd.planning_id,
            progress,
            actions,
        })
    }
}

// === UpdateProjectProgress ===

#[derive(Debug, Clone)]
pub struct UpdateProjectProgressCommand {
    pub project_id: ProjectId,
}

pub struct UpdateProjectProgressHandler {
    work_items: Arc<dyn WorkItemRepository>,
}

impl UpdateProjectProgressHandler {
    pub fn new(work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self { work_items }
    }

    pub async fn handle(
        &self,
        cmd: UpdateProjectProgressCommand,
    ) -> Result<ProgressReport, ProgressError> {
        self.work_items
            .find_project(&cmd.project_id)
            .await?
            .ok_or(ProgressError::ProjectNotFound(cmd.project_id))?;

        for planning in self.work_items.plannings_for_project(&cmd.project_id).await? {
            for action in self.work_items.actions_for_planning(planning.id()).await? {
                refresh_action(self.work_items.as_ref(), action).await?;
            }
        }

        let hierarchy = self
            .work_items
            .load_hierarchy(&cmd.project_id)
            .await?
            .ok_or(ProgressError::ProjectNotFound(cmd.project_id))?;
        let report = ProgressReport::from_hierarchy(&hierarchy);

        tracing::info!(
            project_id = %cmd.project_id,
            progress = %report.progress,
            actions = report.action_count,
            "project progress updated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Seed;

    #[tokio::test]
    async fn action_progress_is_stored() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        let (action, _) = seed.action_with_subs(&planning, "a", 2, 6).await;

        let handler = UpdateActionProgressHandler::new(seed.store.clone());
        let result = handler
            .handle(UpdateActionProgressCommand {
                action_id: *action.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.progress, Percentage::clamped(25.0));
        let stored = seed.store.find_action(action.id()).await.unwrap().unwrap();
        assert_eq!(stored.progress(), Some(25.0));
    }

    #[tokio::test]
    async fn leaf_progress_is_left_untouched() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        let action = seed.leaf_action(&planning, "a", Some(140.0)).await;

        let handler = UpdateActionProgressHandler::new(seed.store.clone());
        let result = handler
            .handle(UpdateActionProgressCommand {
                action_id: *action.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.progress, Percentage::HUNDRED);
        let stored = seed.store.find_action(action.id()).await.unwrap().unwrap();
        assert_eq!(stored.progress(), Some(140.0));
    }

    #[tokio::test]
    async fn missing_action_is_not_found() {
        let seed = Seed::new("Apollo").await;
        let handler = UpdateActionProgressHandler::new(seed.store.clone());
        let id = ActionId::new();

        let err = handler
            .handle(UpdateActionProgressCommand { action_id: id })
            .await
            .unwrap_err();
        assert_eq!(err, ProgressError::ActionNotFound(id));
    }

    #[tokio::test]
    async fn planning_progress_is_mean_of_actions() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        seed.action_with_subs(&planning, "a", 1, 1).await;
        seed.leaf_action(&planning, "b", Some(100.0)).await;

        let handler = UpdatePlanningProgressHandler::new(seed.store.clone());
        let result = handler
            .handle(UpdatePlanningProgressCommand {
                planning_id: *planning.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.progress, Percentage::clamped(75.0));
        assert_eq!(result.actions.len(), 2);
    }

    #[tokio::test]
    async fn missing_planning_is_not_found() {
        let seed = Seed::new("Apollo").await;
        let handler = UpdatePlanningProgressHandler::new(seed.store.clone());
        let id = PlanningId::new();

        let err = handler
            .handle(UpdatePlanningProgressCommand { planning_id: id })
            .await
            .unwrap_err();
        assert_eq!(err, ProgressError::PlanningNotFound(id));
    }

    #[tokio::test]
    async fn project_update_refreshes_every_action() {
        let seed = Seed::new("Apollo").await;
        let first = seed.planning("first").await;
        let second = seed.planning("second").await;
        let (a, _) = seed.action_with_subs(&first, "a", 1, 0).await;
        let (b, _) = seed.action_with_subs(&second, "b", 0, 1).await;

        let handler = UpdateProjectProgressHandler::new(seed.store.clone());
        let report = handler
            .handle(UpdateProjectProgressCommand {
                project_id: *seed.project.id(),
            })
            .await
            .unwrap();

        assert_eq!(report.progress, Percentage::clamped(50.0));
        let a = seed.store.find_action(a.id()).await.unwrap().unwrap();
        let b = seed.store.find_action(b.id()).await.unwrap().unwrap();
        assert_eq!(a.progress(), Some(100.0));
        assert_eq!(b.progress(), Some(0.0));
    }
}
