//! Action dependency graph.
//!
//! - `edge` - The `ActionDependency` edge entity and its fulfillment rule
//! - `graph` - Edge arena with forward/back indices and cycle rejection
//! - `errors` - Typed failures of graph mutations

mod edge;
mod errors;
mod graph;

pub use edge::ActionDependency;
pub use errors::DependencyError;
pub use graph::DependencyGraph;
