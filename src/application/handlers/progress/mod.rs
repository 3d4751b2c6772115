//! Progress handlers - roll-up queries and progress-changing commands.

mod complete_sub_action;
mod get_project_progress;
mod set_action_progress;
mod update_progress;

pub use complete_sub_action::{
    CompleteSubActionCommand, CompleteSubActionHandler, CompleteSubActionResult,
};
pub use get_project_progress::{GetProjectProgressHandler, GetProjectProgressQuery};
pub use set_action_progress::{SetActionProgressCommand, SetActionProgressHandler};
pub use update_progress::{
    UpdateActionProgressCommand, UpdateActionProgressHandler, UpdateActionProgressResult,
    UpdatePlanningProgressCommand, UpdatePlanningProgressHandler, UpdatePlanningProgressResult,
    UpdateProjectProgressCommand, UpdateProjectProgressHandler,
};
