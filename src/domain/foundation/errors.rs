//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidArgument,

    // Not found errors
    ProjectNotFound,
    PlanningNotFound,
    ActionNotFound,
    SubActionNotFound,
    PhaseNotFound,
    DependencyNotFound,
    MetricNotFound,

    // Graph errors
    SelfDependency,
    DuplicateDependency,
    DependencyCycle,

    // Calculation errors
    CalculationFailed,
    CalculationTimeout,

    // Infrastructure errors
    DatabaseError,
    NotificationError,
    InternalError,
}

/// Coarse classification of an [`ErrorCode`], used by callers that map
/// errors onto their own transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    InvalidArgument,
    CalculationFailure,
    PersistenceFailure,
}

impl ErrorCode {
    /// Returns the category this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ProjectNotFound
            | ErrorCode::PlanningNotFound
            | ErrorCode::ActionNotFound
            | ErrorCode::SubActionNotFound
            | ErrorCode::PhaseNotFound
            | ErrorCode::DependencyNotFound
            | ErrorCode::MetricNotFound => ErrorCategory::NotFound,
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidArgument
            | ErrorCode::SelfDependency
            | ErrorCode::DuplicateDependency
            | ErrorCode::DependencyCycle => ErrorCategory::InvalidArgument,
            ErrorCode::CalculationFailed | ErrorCode::CalculationTimeout => {
                ErrorCategory::CalculationFailure
            }
            ErrorCode::DatabaseError | ErrorCode::NotificationError | ErrorCode::InternalError => {
                ErrorCategory::PersistenceFailure
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::ProjectNotFound => "PROJECT_NOT_FOUND",
            ErrorCode::PlanningNotFound => "PLANNING_NOT_FOUND",
            ErrorCode::ActionNotFound => "ACTION_NOT_FOUND",
            ErrorCode::SubActionNotFound => "SUB_ACTION_NOT_FOUND",
            ErrorCode::PhaseNotFound => "PHASE_NOT_FOUND",
            ErrorCode::DependencyNotFound => "DEPENDENCY_NOT_FOUND",
            ErrorCode::MetricNotFound => "METRIC_NOT_FOUND",
            ErrorCode::SelfDependency => "SELF_DEPENDENCY",
            ErrorCode::DuplicateDependency => "DUPLICATE_DEPENDENCY",
            ErrorCode::DependencyCycle => "DEPENDENCY_CYCLE",
            ErrorCode::CalculationFailed => "CALCULATION_FAILED",
            ErrorCode::CalculationTimeout => "CALCULATION_TIMEOUT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotificationError => "NOTIFICATION_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a persistence error, the usual failure of a store adapter.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
