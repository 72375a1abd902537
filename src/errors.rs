//! Centralized error handling.
//!
//! Provides a unified error type for the entire application, rendered as
//! RFC 9457 problem details when it reaches the HTTP boundary.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Media type of problem detail bodies
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("{0}")]
    Internal(String),
}

/// Problem details body (RFC 9457)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    pub kind: String,
    /// Short summary of the problem type
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the problem body; server failures carry the failure message
    pub fn to_problem(&self) -> ProblemDetails {
        let status = self.status();
        let (kind, title) = match status {
            StatusCode::NOT_FOUND => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.5",
                "Not Found",
            ),
            StatusCode::BAD_REQUEST => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.1",
                "Bad Request",
            ),
            StatusCode::CONFLICT => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.10",
                "Conflict",
            ),
            _ => (
                "https://tools.ietf.org/html/rfc9110#section-15.6.1",
                "An error occurred while processing your request.",
            ),
        };

        let detail = match self {
            AppError::NotFound => None,
            other => Some(other.to_string()),
        };

        ProblemDetails {
            kind: kind.to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = self.to_problem();
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(format_validation_errors(&errors))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
