//! DependencyGraphManager - owns the in-memory edge arena and keeps it in
//! step with the dependency store.
//!
//! Mutations take the arena's write lock, apply the change in memory, then
//! persist. A failed write is undone in memory before the lock is released,
//! so the arena never holds an edge the store rejected.
//!
//! Existence checks for new edges and action deletions both happen under the
//! write lock, so an edge never outlives one of its actions.
//!
//! Fulfillment reads go to the work item store directly and do not take the
//! arena lock; a completion that lands concurrently may be seen late.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::dependency::{ActionDependency, DependencyError, DependencyGraph};
use crate::domain::foundation::{ActionId, DomainError};
use crate::ports::{DependencyRepository, WorkItemRepository};

/// Outcome of [`DependencyGraphManager::remove_actions_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRemoval {
    pub deleted_actions: Vec<ActionId>,
    pub detached: Vec<ActionDependency>,
}

pub struct DependencyGraphManager {
    graph: RwLock<DependencyGraph>,
    edges: Arc<dyn DependencyRepository>,
    work_items: Arc<dyn WorkItemRepository>,
}

impl DependencyGraphManager {
    /// A manager over an empty graph.
    pub fn new(
        edges: Arc<dyn DependencyRepository>,
        work_items: Arc<dyn WorkItemRepository>,
    ) -> Self {
        Self {
            graph: RwLock::new(DependencyGraph::new()),
            edges,
            work_items,
        }
    }

    /// A manager whose graph is rebuilt from every stored edge.
    pub async fn load(
        edges: Arc<dyn DependencyRepository>,
        work_items: Arc<dyn WorkItemRepository>,
    ) -> Result<Self, DependencyError> {
        let graph = DependencyGraph::from_edges(edges.find_all().await?)?;
        tracing::info!(edges = graph.len(), "dependency graph loaded");
        Ok(Self {
            graph: RwLock::new(graph),
            edges,
            work_items,
        })
    }

    /// Makes `action_id` depend on `depends_on_id`.
    ///
    /// # Errors
    ///
    /// - `ActionNotFound` if either action is absent
    /// - `SelfDependency`, `DuplicateEdge`, `CycleDetected` per graph rules
    /// - `Infrastructure` if the store rejects the edge (nothing is kept)
    pub async fn add_dependency(
        &self,
        action_id: ActionId,
        depends_on_id: ActionId,
    ) -> Result<ActionDependency, DependencyError> {
        let mut graph = self.graph.write().await;
        self.require_action(&action_id).await?;
        self.require_action(&depends_on_id).await?;
        let edge = graph.add(action_id, depends_on_id)?;

        if let Err(e) = self.edges.save(&edge).await {
            graph.remove(&action_id, &depends_on_id)?;
            tracing::warn!(
                action_id = %action_id,
                depends_on_id = %depends_on_id,
                error = %e,
                "dependency not persisted, rolled back"
            );
            return Err(e.into());
        }

        tracing::info!(
            action_id = %action_id,
            depends_on_id = %depends_on_id,
            dependency_id = %edge.id(),
            "dependency added"
        );
        Ok(edge)
    }

    /// Removes the edge `action_id → depends_on_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such edge exists
    /// - `Infrastructure` if the store fails (the edge is kept)
    pub async fn remove_dependency(
        &self,
        action_id: ActionId,
        depends_on_id: ActionId,
    ) -> Result<ActionDependency, DependencyError> {
        let mut graph = self.graph.write().await;
        let edge = graph.remove(&action_id, &depends_on_id)?;

        if let Err(e) = self.edges.delete(edge.id()).await {
            graph.insert(edge)?;
            return Err(e.into());
        }

        tracing::info!(
            action_id = %action_id,
            depends_on_id = %depends_on_id,
            "dependency removed"
        );
        Ok(edge)
    }

    /// Drops every edge touching the given actions.
    pub async fn detach_actions(
        &self,
        action_ids: &[ActionId],
    ) -> Result<Vec<ActionDependency>, DependencyError> {
        let mut graph = self.graph.write().await;
        self.detach_locked(&mut graph, action_ids).await
    }

    /// Detaches the actions' edges and runs `delete` without releasing the
    /// write lock, so no edge to a doomed action can be added in between.
    ///
    /// `delete` returns the ids it actually removed; edges of removed actions
    /// outside `action_ids` are detached as well. If `delete` fails the
    /// detached edges are restored.
    pub async fn remove_actions_with<F, Fut>(
        &self,
        action_ids: &[ActionId],
        delete: F,
    ) -> Result<ActionRemoval, DependencyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ActionId>, DomainError>>,
    {
        let mut graph = self.graph.write().await;
        let mut detached = self.detach_locked(&mut graph, action_ids).await?;

        let deleted_actions = match delete().await {
            Ok(ids) => ids,
            Err(e) => {
                self.restore_locked(&mut graph, &detached).await;
                return Err(e.into());
            }
        };

        let stragglers: Vec<ActionId> = deleted_actions
            .iter()
            .filter(|id| !action_ids.contains(id))
            .copied()
            .collect();
        if !stragglers.is_empty() {
            detached.extend(self.detach_locked(&mut graph, &stragglers).await?);
        }

        Ok(ActionRemoval {
            deleted_actions,
            detached,
        })
    }

    async fn detach_locked(
        &self,
        graph: &mut DependencyGraph,
        action_ids: &[ActionId],
    ) -> Result<Vec<ActionDependency>, DependencyError> {
        let mut removed = Vec::new();
        for action_id in action_ids {
            removed.extend(graph.detach_action(action_id));
        }

        for (index, edge) in removed.iter().enumerate() {
            if let Err(e) = self.edges.delete(edge.id()).await {
                for pending in &removed[index..] {
                    graph.insert(*pending)?;
                }
                return Err(e.into());
            }
        }

        if !removed.is_empty() {
            tracing::debug!(edges = removed.len(), "dependencies detached");
        }
        Ok(removed)
    }

    async fn restore_locked(&self, graph: &mut DependencyGraph, edges: &[ActionDependency]) {
        for edge in edges {
            if let Err(e) = graph.insert(*edge) {
                tracing::warn!(dependency_id = %edge.id(), error = %e, "dependency not restored");
                continue;
            }
            if let Err(e) = self.edges.save(edge).await {
                tracing::warn!(dependency_id = %edge.id(), error = %e, "dependency not re-persisted");
            }
        }
    }

    /// Edges where the action is the dependent, oldest first.
    pub async fn dependencies_of(&self, action_id: &ActionId) -> Vec<ActionDependency> {
        let graph = self.graph.read().await;
        graph.dependencies_of(action_id).into_iter().copied().collect()
    }

    /// Edges where the action is the prerequisite, oldest first.
    pub async fn dependents_of(&self, action_id: &ActionId) -> Vec<ActionDependency> {
        let graph = self.graph.read().await;
        graph.dependents_of(action_id).into_iter().copied().collect()
    }

    pub async fn edge_count(&self) -> usize {
        self.graph.read().await.len()
    }

    /// True once the prerequisite has an actual end date. A prerequisite
    /// that no longer exists never fulfils the edge.
    pub async fn is_fulfilled(&self, edge: &ActionDependency) -> Result<bool, DependencyError> {
        let prerequisite = self.work_items.find_action(edge.depends_on_id()).await?;
        Ok(prerequisite.is_some_and(|action| edge.is_fulfilled(&action)))
    }

    /// Prerequisite edges of the action that are not yet fulfilled.
    ///
    /// # Errors
    ///
    /// - `ActionNotFound` if the action is absent
    pub async fn blocking_prerequisites(
        &self,
        action_id: &ActionId,
    ) -> Result<Vec<ActionDependency>, DependencyError> {
        self.require_action(action_id).await?;

        let mut blocking = Vec::new();
        for edge in self.dependencies_of(action_id).await {
            if !self.is_fulfilled(&edge).await? {
                blocking.push(edge);
            }
        }
        Ok(blocking)
    }

    /// True when every prerequisite of the action is finished.
    pub async fn is_ready(&self, action_id: &ActionId) -> Result<bool, DependencyError> {
        Ok(self.blocking_prerequisites(action_id).await?.is_empty())
    }

    async fn require_action(&self, action_id: &ActionId) -> Result<(), DependencyError> {
        match self.work_items.find_action(action_id).await? {
            Some(_) => Ok(()),
            None => Err(DependencyError::ActionNotFound(*action_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDependencyStore;
    use crate::application::handlers::test_support::Seed;
    use crate::domain::foundation::{DependencyId, DomainError, ErrorCode, Timestamp};
    use crate::domain::work::{Action, Planning};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockDependencyRepository {
        saved: Mutex<Vec<ActionDependency>>,
        fail_writes: bool,
    }

    impl MockDependencyRepository {
        fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail_writes: false,
            }
        }

        fn failing() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail_writes: true,
            }
        }

        fn saved(&self) -> Vec<ActionDependency> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DependencyRepository for MockDependencyRepository {
        async fn save(&self, edge: &ActionDependency) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated save failure",
                ));
            }
            self.saved.lock().unwrap().push(*edge);
            Ok(())
        }

        async fn delete(&self, _id: &DependencyId) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated delete failure",
                ));
            }
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<ActionDependency>, DomainError> {
            Ok(self.saved())
        }

        async fn find_touching(
            &self,
            _action_id: &ActionId,
        ) -> Result<Vec<ActionDependency>, DomainError> {
            Ok(vec![])
        }
    }

    async fn actions(seed: &Seed, count: usize) -> (Planning, Vec<Action>) {
        let planning = seed.planning("P").await;
        let mut out = Vec::new();
        for i in 0..count {
            out.push(seed.leaf_action(&planning, &format!("a{i}"), None).await);
        }
        (planning, out)
    }

    #[tokio::test]
    async fn add_persists_and_indexes_edge() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let repo = Arc::new(MockDependencyRepository::new());
        let manager = DependencyGraphManager::new(repo.clone(), seed.store.clone());

        let edge = manager
            .add_dependency(*acts[0].id(), *acts[1].id())
            .await
            .unwrap();

        assert_eq!(repo.saved(), vec![edge]);
        assert_eq!(manager.dependencies_of(acts[0].id()).await, vec![edge]);
        assert_eq!(manager.dependents_of(acts[1].id()).await, vec![edge]);
    }

    #[tokio::test]
    async fn missing_actions_are_checked_first() {
        let seed = Seed::new("Apollo").await;
        let manager = DependencyGraphManager::new(
            Arc::new(MockDependencyRepository::new()),
            seed.store.clone(),
        );
        let ghost = ActionId::new();

        let err = manager.add_dependency(ghost, ghost).await.unwrap_err();
        assert_eq!(err, DependencyError::ActionNotFound(ghost));
    }

    #[tokio::test]
    async fn graph_violations_are_rejected() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 3).await;
        let (a, b, c) = (*acts[0].id(), *acts[1].id(), *acts[2].id());
        let manager = DependencyGraphManager::new(
            Arc::new(MockDependencyRepository::new()),
            seed.store.clone(),
        );

        assert_eq!(
            manager.add_dependency(a, a).await.unwrap_err(),
            DependencyError::SelfDependency(a)
        );

        manager.add_dependency(a, b).await.unwrap();
        manager.add_dependency(b, c).await.unwrap();
        assert!(matches!(
            manager.add_dependency(a, b).await,
            Err(DependencyError::DuplicateEdge { .. })
        ));
        assert!(matches!(
            manager.add_dependency(c, a).await,
            Err(DependencyError::CycleDetected { .. })
        ));
        assert_eq!(manager.edge_count().await, 2);
    }

    #[tokio::test]
    async fn failed_save_rolls_back_arena() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let manager = DependencyGraphManager::new(
            Arc::new(MockDependencyRepository::failing()),
            seed.store.clone(),
        );

        let err = manager
            .add_dependency(*acts[0].id(), *acts[1].id())
            .await
            .unwrap_err();

        assert!(matches!(err, DependencyError::Infrastructure(_)));
        assert_eq!(manager.edge_count().await, 0);
        assert!(manager.dependencies_of(acts[0].id()).await.is_empty());
        assert!(manager.dependents_of(acts[1].id()).await.is_empty());
    }

    #[tokio::test]
    async fn remove_missing_edge_is_not_found() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let manager = DependencyGraphManager::new(
            Arc::new(MockDependencyRepository::new()),
            seed.store.clone(),
        );

        let err = manager
            .remove_dependency(*acts[0].id(), *acts[1].id())
            .await
            .unwrap_err();
        assert!(matches!(err, DependencyError::NotFound { .. }));
    }

    #[tokio::test]
    async fn remove_clears_store_and_indices() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let store = Arc::new(InMemoryDependencyStore::new());
        let manager = DependencyGraphManager::new(store.clone(), seed.store.clone());
        let (a, b) = (*acts[0].id(), *acts[1].id());

        manager.add_dependency(a, b).await.unwrap();
        manager.remove_dependency(a, b).await.unwrap();

        assert_eq!(store.edge_count().await, 0);
        assert!(manager.dependents_of(&b).await.is_empty());
    }

    #[tokio::test]
    async fn readiness_follows_prerequisite_completion() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let manager = DependencyGraphManager::new(
            Arc::new(MockDependencyRepository::new()),
            seed.store.clone(),
        );
        let (dependent, prerequisite) = (*acts[0].id(), *acts[1].id());
        let edge = manager.add_dependency(dependent, prerequisite).await.unwrap();

        assert!(!manager.is_fulfilled(&edge).await.unwrap());
        assert!(!manager.is_ready(&dependent).await.unwrap());
        assert_eq!(
            manager.blocking_prerequisites(&dependent).await.unwrap(),
            vec![edge]
        );

        let mut done = acts[1].clone();
        done.complete(Timestamp::now());
        seed.store.save_action(&done).await.unwrap();

        assert!(manager.is_fulfilled(&edge).await.unwrap());
        assert!(manager.is_ready(&dependent).await.unwrap());
        assert!(manager.is_ready(&prerequisite).await.unwrap());
    }

    #[tokio::test]
    async fn load_rebuilds_from_store() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 3).await;
        let store = Arc::new(InMemoryDependencyStore::new());
        let first = DependencyGraphManager::new(store.clone(), seed.store.clone());
        first.add_dependency(*acts[0].id(), *acts[1].id()).await.unwrap();
        first.add_dependency(*acts[1].id(), *acts[2].id()).await.unwrap();

        let reloaded = DependencyGraphManager::load(store, seed.store.clone())
            .await
            .unwrap();

        assert_eq!(reloaded.edge_count().await, 2);
        assert!(matches!(
            reloaded.add_dependency(*acts[2].id(), *acts[0].id()).await,
            Err(DependencyError::CycleDetected { .. })
        ));
    }

    #[tokio::test]
    async fn detach_actions_removes_incident_edges() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 3).await;
        let store = Arc::new(InMemoryDependencyStore::new());
        let manager = DependencyGraphManager::new(store.clone(), seed.store.clone());
        manager.add_dependency(*acts[0].id(), *acts[1].id()).await.unwrap();
        manager.add_dependency(*acts[2].id(), *acts[1].id()).await.unwrap();
        manager.add_dependency(*acts[2].id(), *acts[0].id()).await.unwrap();

        let removed = manager.detach_actions(&[*acts[1].id()]).await.unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(manager.edge_count().await, 1);
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_adds_keep_a_single_edge() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let (a, b) = (*acts[0].id(), *acts[1].id());
        let store = Arc::new(InMemoryDependencyStore::new());
        let manager = DependencyGraphManager::new(store.clone(), seed.store.clone());

        let (first, second, reverse) = tokio::join!(
            manager.add_dependency(a, b),
            manager.add_dependency(a, b),
            manager.add_dependency(b, a),
        );

        let results = [first, second, reverse];
        let added: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(added.len(), 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                err,
                DependencyError::DuplicateEdge { .. } | DependencyError::CycleDetected { .. }
            ));
        }

        let edge = *added[0];
        assert_eq!(manager.edge_count().await, 1);
        assert_eq!(store.edge_count().await, 1);
        assert_eq!(manager.dependencies_of(edge.action_id()).await, vec![edge]);
        assert_eq!(manager.dependents_of(edge.depends_on_id()).await, vec![edge]);
    }

    #[tokio::test]
    async fn add_waits_for_in_flight_removal() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let (a, b) = (*acts[0].id(), *acts[1].id());
        let store = Arc::new(InMemoryDependencyStore::new());
        let manager = Arc::new(DependencyGraphManager::new(
            store.clone(),
            seed.store.clone(),
        ));

        let (started_tx, started_rx) = tokio::sync::oneshot::channel::<()>();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let removal = {
            let manager = manager.clone();
            let work_items = seed.store.clone();
            tokio::spawn(async move {
                manager
                    .remove_actions_with(&[a], move || async move {
                        started_tx.send(()).ok();
                        release_rx.await.ok();
                        work_items.delete_action(&a).await.map(|()| vec![a])
                    })
                    .await
            })
        };

        // The removal now holds the write lock with `a` still stored
        started_rx.await.unwrap();
        let add = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.add_dependency(b, a).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        release_tx.send(()).unwrap();

        let removed = removal.await.unwrap().unwrap();
        assert_eq!(removed.deleted_actions, vec![a]);
        assert_eq!(add.await.unwrap().unwrap_err(), DependencyError::ActionNotFound(a));
        assert_eq!(manager.edge_count().await, 0);
        assert_eq!(store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn failed_delete_restores_detached_edges() {
        let seed = Seed::new("Apollo").await;
        let (_, acts) = actions(&seed, 2).await;
        let (a, b) = (*acts[0].id(), *acts[1].id());
        let store = Arc::new(InMemoryDependencyStore::new());
        let manager = DependencyGraphManager::new(store.clone(), seed.store.clone());
        let edge = manager.add_dependency(a, b).await.unwrap();

        let err = manager
            .remove_actions_with(&[b], || async {
                Err(DomainError::new(ErrorCode::DatabaseError, "Simulated delete failure"))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DependencyError::Infrastructure(_)));
        assert_eq!(manager.dependencies_of(&a).await, vec![edge]);
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn removal_detaches_actions_deleted_alongside() {
        let seed = Seed::new("Apollo").await;
        let (planning, acts) = actions(&seed, 2).await;
        let store = Arc::new(InMemoryDependencyStore::new());
        let manager = DependencyGraphManager::new(store.clone(), seed.store.clone());
        manager.add_dependency(*acts[0].id(), *acts[1].id()).await.unwrap();

        // The caller listed no actions, the store removed both
        let removal = manager
            .remove_actions_with(&[], || seed.store.delete_planning(planning.id()))
            .await
            .unwrap();

        assert_eq!(removal.deleted_actions.len(), 2);
        assert_eq!(removal.detached.len(), 1);
        assert_eq!(manager.edge_count().await, 0);
        assert_eq!(store.edge_count().await, 0);
    }
}
