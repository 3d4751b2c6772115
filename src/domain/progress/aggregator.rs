//! Bottom-up completion roll-up.
//!
//! All functions are pure reads over a snapshot and never look at the
//! denormalized progress an action may carry once it has sub-actions.
//! Empty collections yield zero.

use crate::domain::foundation::Percentage;
use crate::domain::work::{Action, SubAction};

use super::{PlanningNode, ProjectHierarchy};

/// 100 if the sub-action has an actual end date, else 0. No partial credit.
pub fn sub_action_progress(sub_action: &SubAction) -> Percentage {
    if sub_action.is_completed() {
        Percentage::HUNDRED
    } else {
        Percentage::ZERO
    }
}

/// Progress of an action.
///
/// Without sub-actions this is the stored leaf progress clamped to
/// `[0, 100]` (zero if unset). With sub-actions it is the share of finished
/// sub-actions and the stored value is ignored.
pub fn action_progress(action: &Action, sub_actions: &[SubAction]) -> Percentage {
    if sub_actions.is_empty() {
        return action
            .progress()
            .map(Percentage::clamped)
            .unwrap_or(Percentage::ZERO);
    }

    let completed = sub_actions.iter().filter(|sa| sa.is_completed()).count();
    Percentage::ratio(completed, sub_actions.len())
}

/// Arithmetic mean of the planning's action progress.
pub fn planning_progress(planning: &PlanningNode) -> Percentage {
    Percentage::mean(
        planning
            .actions
            .iter()
            .map(|node| action_progress(&node.action, &node.sub_actions)),
    )
}

/// Sum of every action's progress divided by the project-wide action count.
///
/// Plannings with more actions weigh more; this is not the mean of
/// per-planning progress.
pub fn project_progress(project: &ProjectHierarchy) -> Percentage {
    Percentage::mean(
        project
            .actions()
            .map(|node| action_progress(&node.action, &node.sub_actions)),
    )
}
