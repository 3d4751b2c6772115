//! Work hierarchy entities: project → planning → action → sub-action.
//!
//! Entities reference their parent by ID; collections are owned by the
//! store and assembled into snapshots by the progress module.

mod action;
mod planning;
mod project;

pub use action::{Action, SubAction};
pub use planning::{Phase, Planning};
pub use project::{Project, ProjectBudget, MAX_NAME_LENGTH};
