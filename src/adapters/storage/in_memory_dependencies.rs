//! In-Memory Dependency Store

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dependency::ActionDependency;
use crate::domain::foundation::{ActionId, DependencyId, DomainError, ErrorCode};
use crate::ports::DependencyRepository;

use super::table::Table;

/// In-memory storage for dependency edges.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDependencyStore {
    edges: Arc<RwLock<Table<DependencyId, ActionDependency>>>,
}

impl InMemoryDependencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }
}

#[async_trait]
impl DependencyRepository for InMemoryDependencyStore {
    async fn save(&self, edge: &ActionDependency) -> Result<(), DomainError> {
        self.edges.write().await.upsert(*edge.id(), *edge);
        Ok(())
    }

    async fn delete(&self, id: &DependencyId) -> Result<(), DomainError> {
        self.edges
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DependencyNotFound,
                    format!("Dependency not found: {}", id),
                )
            })
    }

    async fn find_all(&self) -> Result<Vec<ActionDependency>, DomainError> {
        Ok(self.edges.read().await.select(|_| true))
    }

    async fn find_touching(
        &self,
        action_id: &ActionId,
    ) -> Result<Vec<ActionDependency>, DomainError> {
        Ok(self
            .edges
            .read()
            .await
            .select(|e| e.action_id() == action_id || e.depends_on_id() == action_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_find_delete() {
        let store = InMemoryDependencyStore::new();
        let (a, b, c) = (ActionId::new(), ActionId::new(), ActionId::new());
        let ab = ActionDependency::new(a, b);
        let bc = ActionDependency::new(b, c);
        store.save(&ab).await.unwrap();
        store.save(&bc).await.unwrap();

        assert_eq!(store.find_all().await.unwrap(), vec![ab, bc]);
        assert_eq!(store.find_touching(&b).await.unwrap().len(), 2);
        assert_eq!(store.find_touching(&a).await.unwrap(), vec![ab]);

        store.delete(ab.id()).await.unwrap();
        assert_eq!(store.edge_count().await, 1);

        let err = store.delete(ab.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DependencyNotFound);
    }
}
