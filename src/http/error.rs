//! Error responses for the JSON API.

use crate::task::{ports::TaskRepositoryError, services::TaskServiceError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body, path, or query failed validation.
    #[error("{0}")]
    Validation(String),

    /// The caller identity is missing or malformed.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// The caller may not change the task.
    #[error("{0}")]
    Forbidden(String),

    /// The task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The task store failed or did not respond in time.
    #[error("task store unavailable")]
    StoreUnavailable,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Unauthenticated(_) => "AuthenticationError",
            Self::Forbidden(_) => "AuthorizationError",
            Self::NotFound(_) => "NotFoundError",
            Self::StoreUnavailable => "StoreUnavailable",
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match &err {
            TaskServiceError::Domain(domain) => Self::Validation(domain.to_string()),
            TaskServiceError::NotFound(_)
            | TaskServiceError::Repository(TaskRepositoryError::NotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            TaskServiceError::NotOwner { .. } => Self::Forbidden(err.to_string()),
            TaskServiceError::Timeout(_) | TaskServiceError::Repository(_) => {
                Self::StoreUnavailable
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
