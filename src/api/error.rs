//! API error type and its HTTP mapping.

use crate::identity::{
    domain::{AccessDenied, Role},
    services::AuthError,
};
use crate::task::{domain::TaskDomainError, services::TaskWorkflowError};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors returned by handlers and the access gate.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, malformed, or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller's role is not admitted.
    #[error("Insufficient permissions")]
    Forbidden(AccessDenied),

    /// The operation is not allowed from the task's current status.
    #[error("{0}")]
    StateConflict(String),

    /// The task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Storage, hashing, or signing failed. The cause is logged only.
    #[error("{0}")]
    Internal(String),
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_roles: Option<&'a [Role]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_role: Option<Role>,
}

impl ApiError {
    fn internal(err: &impl std::error::Error) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::Internal(INTERNAL_MESSAGE.to_owned())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::StateConflict(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let body = match &self {
            Self::Forbidden(denied) => ErrorResponse {
                error: &message,
                required_roles: Some(denied.required.as_slice()),
                user_role: Some(denied.actual),
            },
            _ => ErrorResponse {
                error: &message,
                required_roles: None,
                user_role: None,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        Self::Forbidden(denied)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<TaskDomainError> for ApiError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::StatusConflict { .. } => Self::StateConflict(err.to_string()),
            TaskDomainError::InvalidTaskId(_) => Self::BadRequest("Invalid task ID".to_owned()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<TaskWorkflowError> for ApiError {
    fn from(err: TaskWorkflowError) -> Self {
        match err {
            TaskWorkflowError::AccessDenied(denied) => Self::Forbidden(denied),
            TaskWorkflowError::Domain(domain) => domain.into(),
            TaskWorkflowError::InvalidAssignee(_) => Self::BadRequest(err.to_string()),
            TaskWorkflowError::NotFound(_) => Self::NotFound(err.to_string()),
            TaskWorkflowError::Repository(_) | TaskWorkflowError::Users(_) => Self::internal(&err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::InvalidToken(_) => Self::Unauthorized("Invalid or expired token".to_owned()),
            AuthError::TokenIssue(_) | AuthError::Hash(_) | AuthError::Repository(_) => {
                Self::internal(&err)
            }
        }
    }
}
