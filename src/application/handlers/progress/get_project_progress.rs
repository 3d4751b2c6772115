//! GetProjectProgressHandler - Query handler for the progress breakdown of a project.

use std::sync::Arc;

use crate::domain::foundation::ProjectId;
use crate::domain::progress::{ProgressError, ProgressReport};
use crate::ports::WorkItemRepository;

/// Query for a project's progress report.
#[derive(Debug, Clone)]
pub struct GetProjectProgressQuery {
    pub project_id: ProjectId,
}

/// Handler for reading project progress. Never writes.
pub struct GetProjectProgressHandler {
    work_items: Arc<dyn WorkItemRepository>,
}

impl GetProjectProgressHandler {
    pub fn new(work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self { work_items }
    }

    pub async fn handle(&self, query: GetProjectProgressQuery) -> Result<ProgressReport, ProgressError> {
        let hierarchy = self
            .work_items
            .load_hierarchy(&query.project_id)
            .await?
            .ok_or(ProgressError::ProjectNotFound(query.project_id))?;

        Ok(ProgressReport::from_hierarchy(&hierarchy))
    }
}
