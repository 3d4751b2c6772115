//! DependencyGraph - the single source of truth for action dependency edges.
//!
//! Edges live in one arena keyed by [`DependencyId`]. Forward (action →
//! prerequisites) and back (prerequisite → dependents) indices, plus an
//! ordered-pair index for duplicate detection, are derived from the arena
//! and only ever updated together inside this type.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::foundation::{ActionId, DependencyId};

use super::{ActionDependency, DependencyError};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: HashMap<DependencyId, ActionDependency>,
    prerequisites: HashMap<ActionId, BTreeSet<DependencyId>>,
    dependents: HashMap<ActionId, BTreeSet<DependencyId>>,
    pairs: HashMap<(ActionId, ActionId), DependencyId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a graph from persisted edges, applying the same checks as
    /// [`DependencyGraph::insert`].
    pub fn from_edges<I>(edges: I) -> Result<Self, DependencyError>
    where
        I: IntoIterator<Item = ActionDependency>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.insert(edge)?;
        }
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> impl Iterator<Item = &ActionDependency> {
        self.edges.values()
    }

    pub fn get(&self, id: &DependencyId) -> Option<&ActionDependency> {
        self.edges.get(id)
    }

    /// The edge `action_id → depends_on_id`, if present.
    pub fn find(&self, action_id: &ActionId, depends_on_id: &ActionId) -> Option<&ActionDependency> {
        self.pairs
            .get(&(*action_id, *depends_on_id))
            .and_then(|id| self.edges.get(id))
    }

    /// Checks whether `action_id → depends_on_id` may be added.
    ///
    /// # Errors
    ///
    /// - `SelfDependency` if both ends are the same action
    /// - `DuplicateEdge` if the ordered pair already exists
    /// - `CycleDetected` if the prerequisite already reaches the action
    pub fn check_new_edge(
        &self,
        action_id: &ActionId,
        depends_on_id: &ActionId,
    ) -> Result<(), DependencyError> {
        if action_id == depends_on_id {
            return Err(DependencyError::SelfDependency(*action_id));
        }
        if self.pairs.contains_key(&(*action_id, *depends_on_id)) {
            return Err(DependencyError::DuplicateEdge {
                action_id: *action_id,
                depends_on_id: *depends_on_id,
            });
        }
        if self.depends_transitively(depends_on_id, action_id) {
            return Err(DependencyError::CycleDetected {
                action_id: *action_id,
                depends_on_id: *depends_on_id,
            });
        }
        Ok(())
    }

    /// Creates and inserts the edge `action_id → depends_on_id`.
    pub fn add(
        &mut self,
        action_id: ActionId,
        depends_on_id: ActionId,
    ) -> Result<ActionDependency, DependencyError> {
        let edge = ActionDependency::new(action_id, depends_on_id);
        self.insert(edge)?;
        Ok(edge)
    }

    /// Inserts an existing edge into the arena and every index.
    ///
    /// Either all indices are updated or, on error, none are.
    pub fn insert(&mut self, edge: ActionDependency) -> Result<(), DependencyError> {
        self.check_new_edge(edge.action_id(), edge.depends_on_id())?;

        let id = *edge.id();
        self.prerequisites
            .entry(*edge.action_id())
            .or_default()
            .insert(id);
        self.dependents
            .entry(*edge.depends_on_id())
            .or_default()
            .insert(id);
        self.pairs
            .insert((*edge.action_id(), *edge.depends_on_id()), id);
        self.edges.insert(id, edge);
        Ok(())
    }

    /// Removes the edge `action_id → depends_on_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such edge exists
    pub fn remove(
        &mut self,
        action_id: &ActionId,
        depends_on_id: &ActionId,
    ) -> Result<ActionDependency, DependencyError> {
        let id = self
            .pairs
            .get(&(*action_id, *depends_on_id))
            .copied()
            .ok_or(DependencyError::NotFound {
                action_id: *action_id,
                depends_on_id: *depends_on_id,
            })?;
        self.remove_by_id(&id).ok_or(DependencyError::NotFound {
            action_id: *action_id,
            depends_on_id: *depends_on_id,
        })
    }

    /// Removes every edge touching `action_id`, in either direction.
    pub fn detach_action(&mut self, action_id: &ActionId) -> Vec<ActionDependency> {
        let incident: Vec<DependencyId> = self
            .prerequisites
            .get(action_id)
            .into_iter()
            .chain(self.dependents.get(action_id))
            .flat_map(|ids| ids.iter().copied())
            .collect();

        incident
            .iter()
            .filter_map(|id| self.remove_by_id(id))
            .collect()
    }

    /// Edges where `action_id` is the dependent, oldest first.
    pub fn dependencies_of(&self, action_id: &ActionId) -> Vec<&ActionDependency> {
        self.collect_sorted(self.prerequisites.get(action_id))
    }

    /// Edges where `action_id` is the prerequisite, oldest first.
    pub fn dependents_of(&self, action_id: &ActionId) -> Vec<&ActionDependency> {
        self.collect_sorted(self.dependents.get(action_id))
    }

    /// True if `from` reaches `to` by following prerequisite edges.
    pub fn depends_transitively(&self, from: &ActionId, to: &ActionId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![*from];

        while let Some(current) = stack.pop() {
            if &current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for edge in self.dependencies_of(&current) {
                if !visited.contains(edge.depends_on_id()) {
                    stack.push(*edge.depends_on_id());
                }
            }
        }

        false
    }

    fn remove_by_id(&mut self, id: &DependencyId) -> Option<ActionDependency> {
        let edge = self.edges.remove(id)?;
        prune(&mut self.prerequisites, edge.action_id(), id);
        prune(&mut self.dependents, edge.depends_on_id(), id);
        self.pairs.remove(&(*edge.action_id(), *edge.depends_on_id()));
        Some(edge)
    }

    fn collect_sorted(&self, ids: Option<&BTreeSet<DependencyId>>) -> Vec<&ActionDependency> {
        let mut edges: Vec<&ActionDependency> = ids
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
            .collect();
        edges.sort_by_key(|edge| *edge.created_at());
        edges
    }
}

fn prune(
    index: &mut HashMap<ActionId, BTreeSet<DependencyId>>,
    key: &ActionId,
    id: &DependencyId,
) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<const N: usize>() -> [ActionId; N] {
        std::array::from_fn(|_| ActionId::new())
    }

    #[test]
    fn add_updates_both_directions() {
        let [a, b] = ids();
        let mut graph = DependencyGraph::new();
        let edge = graph.add(a, b).unwrap();

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.dependencies_of(&a), vec![&edge]);
        assert_eq!(graph.dependents_of(&b), vec![&edge]);
        assert!(graph.dependencies_of(&b).is_empty());
        assert_eq!(graph.find(&a, &b), Some(&edge));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let [a] = ids();
        let mut graph = DependencyGraph::new();
        assert_eq!(graph.add(a, a), Err(DependencyError::SelfDependency(a)));
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_edge_is_rejected() {
        let [a, b] = ids();
        let mut graph = DependencyGraph::new();
        graph.add(a, b).unwrap();

        assert_eq!(
            graph.add(a, b),
            Err(DependencyError::DuplicateEdge {
                action_id: a,
                depends_on_id: b
            })
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn direct_and_transitive_cycles_are_rejected() {
        let [a, b, c] = ids();
        let mut graph = DependencyGraph::new();
        graph.add(a, b).unwrap();
        graph.add(b, c).unwrap();

        assert!(matches!(
            graph.add(b, a),
            Err(DependencyError::CycleDetected { .. })
        ));
        assert!(matches!(
            graph.add(c, a),
            Err(DependencyError::CycleDetected { .. })
        ));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn diamonds_are_allowed() {
        let [a, b, c, d] = ids();
        let mut graph = DependencyGraph::new();
        graph.add(a, b).unwrap();
        graph.add(a, c).unwrap();
        graph.add(b, d).unwrap();
        graph.add(c, d).unwrap();

        assert!(graph.depends_transitively(&a, &d));
        assert!(!graph.depends_transitively(&d, &a));
    }

    #[test]
    fn remove_missing_edge_is_not_found() {
        let [a, b] = ids();
        let mut graph = DependencyGraph::new();
        assert_eq!(
            graph.remove(&a, &b),
            Err(DependencyError::NotFound {
                action_id: a,
                depends_on_id: b
            })
        );
    }

    #[test]
    fn remove_clears_every_index() {
        let [a, b] = ids();
        let mut graph = DependencyGraph::new();
        graph.add(a, b).unwrap();
        graph.remove(&a, &b).unwrap();

        assert!(graph.is_empty());
        assert!(graph.dependencies_of(&a).is_empty());
        assert!(graph.dependents_of(&b).is_empty());
        assert!(graph.find(&a, &b).is_none());
        // the pair can be added again afterwards
        assert!(graph.add(a, b).is_ok());
    }

    #[test]
    fn detach_action_drops_incident_edges_only() {
        let [a, b, c, d] = ids();
        let mut graph = DependencyGraph::new();
        graph.add(a, b).unwrap();
        graph.add(b, c).unwrap();
        graph.add(c, d).unwrap();

        let removed = graph.detach_action(&b);

        assert_eq!(removed.len(), 2);
        assert_eq!(graph.len(), 1);
        assert!(graph.find(&c, &d).is_some());
        assert!(graph.dependents_of(&b).is_empty());
    }

    #[test]
    fn from_edges_rejects_inconsistent_input() {
        let [a, b] = ids();
        let forward = ActionDependency::new(a, b);
        let backward = ActionDependency::new(b, a);

        assert!(DependencyGraph::from_edges(vec![forward]).is_ok());
        assert!(DependencyGraph::from_edges(vec![forward, backward]).is_err());
    }
}
