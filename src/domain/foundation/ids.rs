//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype with the standard constructors,
/// `Display`, `FromStr` and serde transparency.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a project.
    ProjectId
);

uuid_id!(
    /// Unique identifier for a planning (project + phase grouping of actions).
    PlanningId
);

uuid_id!(
    /// Unique identifier for an action.
    ActionId
);

uuid_id!(
    /// Unique identifier for a sub-action.
    SubActionId
);

uuid_id!(
    /// Unique identifier for a portfolio phase.
    PhaseId
);

uuid_id!(
    /// Unique identifier for a project budget record.
    BudgetId
);

uuid_id!(
    /// Unique identifier for a dependency edge between two actions.
    DependencyId
);

uuid_id!(
    /// Unique identifier for a KPI metric definition.
    KpiMetricId
);

uuid_id!(
    /// Unique identifier for a recorded KPI value.
    KpiValueId
);
