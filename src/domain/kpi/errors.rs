//! KPI-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, KpiMetricId, ProjectId, ValidationError};

use super::FormulaError;

/// Errors surfaced by KPI calculation, recording and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KpiError {
    #[error("KPI metric not found: {0}")]
    MetricNotFound(KpiMetricId),

    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Calculation of {metric_code} failed: {reason}")]
    CalculationFailed { metric_code: String, reason: String },

    #[error("Formula of {metric_code} failed: {source}")]
    Formula {
        metric_code: String,
        #[source]
        source: FormulaError,
    },

    #[error("Calculation of {metric_code} for project {project_id} timed out")]
    Timeout {
        metric_code: String,
        project_id: ProjectId,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl KpiError {
    pub fn calculation(metric_code: impl Into<String>, reason: impl Into<String>) -> Self {
        KpiError::CalculationFailed {
            metric_code: metric_code.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            KpiError::MetricNotFound(_) => ErrorCode::MetricNotFound,
            KpiError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            KpiError::CalculationFailed { .. } => ErrorCode::CalculationFailed,
            KpiError::Formula { source, .. } => source.code(),
            KpiError::Timeout { .. } => ErrorCode::CalculationTimeout,
            KpiError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            KpiError::Validation(_) => ErrorCode::ValidationFailed,
            KpiError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for KpiError {
    fn from(err: DomainError) -> Self {
        KpiError::Infrastructure(err.to_string())
    }
}
