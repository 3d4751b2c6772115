//! Event bus adapters.
//!
//! Adapters implement the event publishing port for different environments:
//!
//! - `InMemoryEventBus` - In-process capture bus for tests and local runs
//! - `TracingNotificationSink` - Writes threshold notifications to the log

mod in_memory;
mod tracing_sink;

pub use in_memory::InMemoryEventBus;
pub use tracing_sink::TracingNotificationSink;
