//! Dependency repository port.
//!
//! Stores `ActionDependency` edges. Graph rules live in the domain; this
//! port only persists what the graph manager has already accepted.

use async_trait::async_trait;

use crate::domain::dependency::ActionDependency;
use crate::domain::foundation::{ActionId, DependencyId, DomainError};

#[async_trait]
pub trait DependencyRepository: Send + Sync {
    async fn save(&self, edge: &ActionDependency) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `DependencyNotFound` if no edge has this id
    async fn delete(&self, id: &DependencyId) -> Result<(), DomainError>;

    /// Every stored edge, used to rebuild the in-memory graph.
    async fn find_all(&self) -> Result<Vec<ActionDependency>, DomainError>;

    /// Edges where the action is either endpoint.
    async fn find_touching(&self, action_id: &ActionId)
        -> Result<Vec<ActionDependency>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DependencyRepository) {}
    }
}
