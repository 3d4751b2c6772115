//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and event plumbing
//! that form the vocabulary of the portfolio domain.

mod audit;
mod errors;
mod events;
mod ids;
mod percentage;
mod timestamp;

pub use audit::AuditInfo;
pub use errors::{DomainError, ErrorCategory, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{
    ActionId, BudgetId, DependencyId, KpiMetricId, KpiValueId, PhaseId, PlanningId, ProjectId,
    SubActionId,
};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
