//! CompleteSubActionHandler - Command handler for finishing a sub-action.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, Percentage, SubActionId, Timestamp};
use crate::domain::progress::{action_progress, ProgressError};
use crate::ports::WorkItemRepository;

/// Command to stamp a sub-action's actual end date.
#[derive(Debug, Clone)]
pub struct CompleteSubActionCommand {
    pub sub_action_id: SubActionId,
    /// Defaults to now.
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteSubActionResult {
    pub sub_action_id: SubActionId,
    pub action_id: ActionId,
    /// Parent progress after the completion.
    pub action_progress: Percentage,
}

pub struct CompleteSubActionHandler {
    work_items: Arc<dyn WorkItemRepository>,
}

impl CompleteSubActionHandler {
    pub fn new(work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self { work_items }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSubActionCommand,
    ) -> Result<CompleteSubActionResult, ProgressError> {
        let mut sub_action = self
            .work_items
            .find_sub_action(&cmd.sub_action_id)
            .await?
            .ok_or(ProgressError::SubActionNotFound(cmd.sub_action_id))?;

        sub_action.complete(cmd.completed_at.unwrap_or_else(Timestamp::now));
        self.work_items.save_sub_action(&sub_action).await?;

        let action_id = *sub_action.action_id();
        let mut action = self
            .work_items
            .find_action(&action_id)
            .await?
            .ok_or(ProgressError::ActionNotFound(action_id))?;
        let siblings = self.work_items.sub_actions_for_action(&action_id).await?;
        let progress = action_progress(&action, &siblings);

        action.record_computed_progress(progress);
        self.work_items.save_action(&action).await?;

        tracing::debug!(
            sub_action_id = %cmd.sub_action_id,
            action_id = %action_id,
            %progress,
            "sub-action completed"
        );

        Ok(CompleteSubActionResult {
            sub_action_id: cmd.sub_action_id,
            action_id,
            action_progress: progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Seed;

    #[tokio::test]
    async fn completing_last_open_sub_action_finishes_the_action() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        let (action, subs) = seed.action_with_subs(&planning, "a", 1, 1).await;
        let at = Timestamp::now();

        let handler = CompleteSubActionHandler::new(seed.store.clone());
        let result = handler
            .handle(CompleteSubActionCommand {
                sub_action_id: *subs[1].id(),
                completed_at: Some(at),
            })
            .await
            .unwrap();

        assert_eq!(result.action_id, *action.id());
        assert_eq!(result.action_progress, Percentage::HUNDRED);

        let sub = seed.store.find_sub_action(subs[1].id()).await.unwrap().unwrap();
        assert_eq!(sub.actual_end(), Some(&at));
        let stored = seed.store.find_action(action.id()).await.unwrap().unwrap();
        assert_eq!(stored.progress(), Some(100.0));
    }

    #[tokio::test]
    async fn missing_sub_action_is_not_found() {
        let seed = Seed::new("Apollo").await;
        let handler = CompleteSubActionHandler::new(seed.store.clone());
        let id = SubActionId::new();

        let err = handler
            .handle(CompleteSubActionCommand {
                sub_action_id: id,
                completed_at: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, ProgressError::SubActionNotFound(id));
    }
}
