//! Dependency-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ActionId, DomainError, ErrorCode};

/// Errors surfaced by dependency graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("Action not found: {0}")]
    ActionNotFound(ActionId),

    #[error("Dependency not found: {action_id} does not depend on {depends_on_id}")]
    NotFound {
        action_id: ActionId,
        depends_on_id: ActionId,
    },

    #[error("Action cannot depend on itself: {0}")]
    SelfDependency(ActionId),

    #[error("Dependency already exists: {action_id} depends on {depends_on_id}")]
    DuplicateEdge {
        action_id: ActionId,
        depends_on_id: ActionId,
    },

    #[error("Dependency would create a cycle: {depends_on_id} already depends on {action_id}")]
    CycleDetected {
        action_id: ActionId,
        depends_on_id: ActionId,
    },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl DependencyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DependencyError::ActionNotFound(_) => ErrorCode::ActionNotFound,
            DependencyError::NotFound { .. } => ErrorCode::DependencyNotFound,
            DependencyError::SelfDependency(_) => ErrorCode::SelfDependency,
            DependencyError::DuplicateEdge { .. } => ErrorCode::DuplicateDependency,
            DependencyError::CycleDetected { .. } => ErrorCode::DependencyCycle,
            DependencyError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for DependencyError {
    fn from(err: DomainError) -> Self {
        DependencyError::Infrastructure(err.to_string())
    }
}
