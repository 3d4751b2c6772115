//! Planning handlers - structural changes that cascade through the tree.

mod delete_planning;
mod remove_action;

pub use delete_planning::{DeletePlanningCommand, DeletePlanningHandler, DeletePlanningResult};
pub use remove_action::{RemoveActionFromPlanningCommand, RemoveActionFromPlanningHandler};
