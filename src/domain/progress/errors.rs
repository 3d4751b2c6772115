//! Progress-specific error types.

use thiserror::Error;

use crate::domain::foundation::{
    ActionId, DomainError, ErrorCode, PlanningId, ProjectId, SubActionId, ValidationError,
};

/// Errors surfaced by progress commands and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Planning not found: {0}")]
    PlanningNotFound(PlanningId),

    #[error("Action not found: {0}")]
    ActionNotFound(ActionId),

    #[error("Sub-action not found: {0}")]
    SubActionNotFound(SubActionId),

    #[error("Action {action_id} does not belong to planning {planning_id}")]
    ActionNotInPlanning {
        action_id: ActionId,
        planning_id: PlanningId,
    },

    #[error("Invalid progress: {0}")]
    InvalidProgress(#[from] ValidationError),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl ProgressError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProgressError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            ProgressError::PlanningNotFound(_) => ErrorCode::PlanningNotFound,
            ProgressError::ActionNotFound(_) => ErrorCode::ActionNotFound,
            ProgressError::SubActionNotFound(_) => ErrorCode::SubActionNotFound,
            ProgressError::ActionNotInPlanning { .. } => ErrorCode::InvalidArgument,
            ProgressError::InvalidProgress(_) => ErrorCode::ValidationFailed,
            ProgressError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for ProgressError {
    fn from(err: DomainError) -> Self {
        ProgressError::Infrastructure(err.to_string())
    }
}
