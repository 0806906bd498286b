//! Application error types with HTTP status conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Classification of a failed graph statement.
///
/// Decided once at the backend-client boundary from the backend's status
/// code, so recovery logic never inspects message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// A uniqueness (or other schema) constraint rejected the write.
    ConstraintViolation,
    /// The backend reported that the addressed data does not exist.
    NotFound,
    /// Transient backend failure (deadlock, leader switch, ...).
    Transient,
    /// Anything else: syntax errors, type errors, security errors.
    Other,
}

impl QueryErrorKind {
    /// Classify a Neo4j status code (e.g. `Neo.ClientError.Schema.ConstraintValidationFailed`).
    pub fn from_code(code: &str) -> Self {
        match code {
            "Neo.ClientError.Schema.ConstraintValidationFailed"
            | "Neo.ClientError.Schema.ConstraintViolation" => Self::ConstraintViolation,
            "Neo.ClientError.Statement.EntityNotFound" => Self::NotFound,
            _ if code.starts_with("Neo.TransientError.") => Self::Transient,
            _ => Self::Other,
        }
    }
}

/// Application-level errors for the route service.
#[derive(Error, Debug)]
pub enum AppError {
    // Graph backend errors
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Graph connection is closed")]
    NotConnected,

    #[error("Neo4j query error [{code}]: {message}")]
    Query {
        kind: QueryErrorKind,
        code: String,
        message: String,
        query: String,
    },

    #[error("Failed to decode '{field}': {reason}")]
    Decode { field: String, reason: String },

    #[error("Failed to serialize parameter '{name}': {reason}")]
    Serialization { name: String, reason: String },

    // Domain errors
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the query error kind, if this is a classified statement failure.
    pub fn query_kind(&self) -> Option<QueryErrorKind> {
        match self {
            AppError::Query { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True when the backend rejected a write because of a uniqueness constraint.
    pub fn is_constraint_violation(&self) -> bool {
        self.query_kind() == Some(QueryErrorKind::ConstraintViolation)
    }

    /// True when the backend reported that the addressed data does not exist.
    pub fn is_not_found(&self) -> bool {
        self.query_kind() == Some(QueryErrorKind::NotFound)
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::RouteNotFound(_) => (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Connection(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONNECTION_ERROR"),
            AppError::NotConnected => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONNECTED"),
            AppError::Query { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "QUERY_ERROR"),
            AppError::Decode { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DECODE_ERROR"),
            AppError::Serialization { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
