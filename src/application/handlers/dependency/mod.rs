//! Dependency handlers.

mod graph_manager;

pub use graph_manager::{ActionRemoval, DependencyGraphManager};
