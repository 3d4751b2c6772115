//! Read-only snapshots of the work hierarchy used by aggregation.

use crate::domain::work::{Action, Planning, Project, ProjectBudget, SubAction};

/// An action together with its sub-actions.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionNode {
    pub action: Action,
    pub sub_actions: Vec<SubAction>,
}

impl ActionNode {
    pub fn new(action: Action, sub_actions: Vec<SubAction>) -> Self {
        Self { action, sub_actions }
    }

    /// A node for an action that has no sub-actions.
    pub fn leaf(action: Action) -> Self {
        Self::new(action, Vec::new())
    }

    pub fn completed_sub_actions(&self) -> usize {
        self.sub_actions.iter().filter(|sa| sa.is_completed()).count()
    }
}

/// A planning together with its actions.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningNode {
    pub planning: Planning,
    pub actions: Vec<ActionNode>,
}

impl PlanningNode {
    pub fn new(planning: Planning, actions: Vec<ActionNode>) -> Self {
        Self { planning, actions }
    }
}

/// A project with its whole subtree and budget records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectHierarchy {
    pub project: Project,
    pub plannings: Vec<PlanningNode>,
    pub budgets: Vec<ProjectBudget>,
}

impl ProjectHierarchy {
    pub fn new(project: Project, plannings: Vec<PlanningNode>) -> Self {
        Self {
            project,
            plannings,
            budgets: Vec::new(),
        }
    }

    pub fn with_budgets(mut self, budgets: Vec<ProjectBudget>) -> Self {
        self.budgets = budgets;
        self
    }

    /// Every action across every planning.
    pub fn actions(&self) -> impl Iterator<Item = &ActionNode> {
        self.plannings.iter().flat_map(|p| p.actions.iter())
    }

    pub fn action_count(&self) -> usize {
        self.plannings.iter().map(|p| p.actions.len()).sum()
    }

    pub fn completed_action_count(&self) -> usize {
        self.actions().filter(|node| node.action.is_completed()).count()
    }

    pub fn sub_action_count(&self) -> usize {
        self.actions().map(|node| node.sub_actions.len()).sum()
    }

    pub fn completed_sub_action_count(&self) -> usize {
        self.actions().map(ActionNode::completed_sub_actions).sum()
    }

    /// The first active budget record, in stored order.
    pub fn active_budget(&self) -> Option<&ProjectBudget> {
        self.budgets.iter().find(|b| b.is_active())
    }
}
