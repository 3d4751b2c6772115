//! ActionDependency edge entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActionId, DependencyId, Timestamp};
use crate::domain::work::Action;

/// Directed "blocked-by" edge: `action` cannot be considered unblocked
/// until `depends_on` is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDependency {
    id: DependencyId,
    action_id: ActionId,
    depends_on_id: ActionId,
    created_at: Timestamp,
}

impl ActionDependency {
    /// Creates an edge. Endpoint validation belongs to [`super::DependencyGraph`].
    pub fn new(action_id: ActionId, depends_on_id: ActionId) -> Self {
        Self {
            id: DependencyId::new(),
            action_id,
            depends_on_id,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute an edge from persistence.
    pub fn reconstitute(
        id: DependencyId,
        action_id: ActionId,
        depends_on_id: ActionId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            action_id,
            depends_on_id,
            created_at,
        }
    }

    pub fn id(&self) -> &DependencyId {
        &self.id
    }

    /// The dependent action.
    pub fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    /// The prerequisite action.
    pub fn depends_on_id(&self) -> &ActionId {
        &self.depends_on_id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// True iff `prerequisite` is this edge's prerequisite and has an actual end date.
    pub fn is_fulfilled(&self, prerequisite: &Action) -> bool {
        prerequisite.id() == &self.depends_on_id && prerequisite.is_completed()
    }
}
