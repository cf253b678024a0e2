//! # API Error Types
//!
//! Unified error handling for the HTTP layer. Every error renders as a
//! plain-text body with its status code.

use attendance_persistence::PersistenceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use thiserror::Error;

/// What a request was doing when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retrieve,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Retrieve => "retrieve",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Entity or patch property absent; carries the full message
    #[error("{0}")]
    NotFound(String),

    /// Rejected input; carries the full message
    #[error("{0}")]
    Validation(String),

    #[error("Failed to {action} {entity}. Error: {cause}")]
    OperationFailed {
        action: Action,
        entity: &'static str,
        cause: String,
    },
}

impl ApiError {
    /// `"{Entity} not found."`
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found."))
    }

    pub fn failed(action: Action, entity: &'static str, cause: impl ToString) -> Self {
        Self::OperationFailed {
            action,
            entity,
            cause: cause.to_string(),
        }
    }

    /// Map a persistence failure raised while performing `action` on `entity`
    pub fn from_persistence(err: PersistenceError, action: Action, entity: &'static str) -> Self {
        match err {
            PersistenceError::NotFound { entity_type, .. } => Self::not_found(entity_type),
            PersistenceError::Patch(e) if e.is_not_found() => Self::NotFound(e.to_string()),
            PersistenceError::Patch(e) => Self::Validation(e.to_string()),
            other => Self::failed(action, entity, other),
        }
    }

    /// Get HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::OperationFailed { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable error code for logs
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::OperationFailed { .. } => "OPERATION_FAILED",
        }
    }
}

/// Closure mapping a [`PersistenceError`] for `map_err`
pub fn persistence(
    action: Action,
    entity: &'static str,
) -> impl FnOnce(PersistenceError) -> ApiError {
    move |err| ApiError::from_persistence(err, action, entity)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Self::OperationFailed { .. } = self {
            tracing::warn!(code = self.error_code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "Request rejected");
        }

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
