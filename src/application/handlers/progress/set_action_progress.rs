//! SetActionProgressHandler - Command handler for caller-reported leaf progress.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, Percentage};
use crate::domain::progress::ProgressError;
use crate::ports::WorkItemRepository;

/// Command to set the progress of an action.
///
/// The value only counts while the action has no sub-actions.
#[derive(Debug, Clone)]
pub struct SetActionProgressCommand {
    pub action_id: ActionId,
    pub progress: f64,
}

pub struct SetActionProgressHandler {
    work_items: Arc<dyn WorkItemRepository>,
}

impl SetActionProgressHandler {
    pub fn new(work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self { work_items }
    }

    pub async fn handle(&self, cmd: SetActionProgressCommand) -> Result<Percentage, ProgressError> {
        let progress = Percentage::try_new(cmd.progress)?;

        let mut action = self
            .work_items
            .find_action(&cmd.action_id)
            .await?
            .ok_or(ProgressError::ActionNotFound(cmd.action_id))?;

        action.set_progress(progress);
        self.work_items.save_action(&action).await?;

        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Seed;
    use crate::domain::foundation::{ErrorCategory, ValidationError};

    #[tokio::test]
    async fn stores_valid_progress() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        let action = seed.leaf_action(&planning, "a", None).await;

        let handler = SetActionProgressHandler::new(seed.store.clone());
        handler
            .handle(SetActionProgressCommand {
                action_id: *action.id(),
                progress: 40.0,
            })
            .await
            .unwrap();

        let stored = seed.store.find_action(action.id()).await.unwrap().unwrap();
        assert_eq!(stored.progress(), Some(40.0));
    }

    #[tokio::test]
    async fn rejects_out_of_range_values() {
        let seed = Seed::new("Apollo").await;
        let planning = seed.planning("P").await;
        let action = seed.leaf_action(&planning, "a", None).await;
        let handler = SetActionProgressHandler::new(seed.store.clone());

        for bad in [-1.0, 100.5, f64::NAN] {
            let err = handler
                .handle(SetActionProgressCommand {
                    action_id: *action.id(),
                    progress: bad,
                })
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                ProgressError::InvalidProgress(ValidationError::OutOfRange { .. })
            ));
            assert_eq!(err.code().category(), ErrorCategory::InvalidArgument);
        }
    }

    #[tokio::test]
    async fn missing_action_is_not_found() {
        let seed = Seed::new("Apollo").await;
        let handler = SetActionProgressHandler::new(seed.store.clone());
        let id = ActionId::new();

        let err = handler
            .handle(SetActionProgressCommand {
                action_id: id,
                progress: 10.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err, ProgressError::ActionNotFound(id));
    }
}
