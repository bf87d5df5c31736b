//! Typed error handling for the invoice service
//!
//! Every failure that can cross the HTTP boundary is an [`ApiError`]. Each
//! category carries its own HTTP status and stable error code, so handlers can
//! simply propagate with `?` and let [`IntoResponse`] render the uniform body:
//!
//! ```json
//! { "code": "INVOICE_NOT_FOUND", "message": "Invoice not found" }
//! ```
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or missing request input
//! - [`EntityError`]: no invoice matches the owner-scoped lookup
//! - [`RequestError`]: rejected by the authentication gate
//! - [`StorageError`]: the document store failed or is unreachable
//!
//! [`ConfigError`] is raised at startup only and never reaches a client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::id::RecordId;

/// Message returned to clients for any storage failure
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// The main error type of the service
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request shape validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Owner-scoped entity lookups
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Authentication / authorization gate
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Document store failures
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Entity(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Entity(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Message safe to hand to a client
    ///
    /// Server-side failures never leak their cause.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) => GENERIC_SERVER_ERROR.to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(ValidationError::Failed(violations)) => {
                Some(serde_json::json!({ "fields": violations }))
            }
            _ => None,
        }
    }

    /// Shortcut for the owner-scoped "no such invoice" outcome
    pub fn invoice_not_found(invoice_id: RecordId) -> Self {
        ApiError::Entity(EntityError::NotFound { invoice_id })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Entity(EntityError::NotFound { .. }))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// One offending field of a rejected request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the field, e.g. `issuer.email` or `items.0.rate`
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to input validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// All violations found in a request, never just the first
    #[error("{}", join_messages(.0))]
    Failed(Vec<FieldViolation>),

    /// The body could not be parsed as JSON at all
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Failed(vec![FieldViolation::new(field, message)])
    }

    /// Violations carried by this error (empty for malformed bodies)
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationError::Failed(v) => v,
            ValidationError::MalformedBody(_) => &[],
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to owner-scoped invoice operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EntityError {
    /// No invoice matches both id and owner
    ///
    /// The message is deliberately the same whether the id does not exist or
    /// belongs to another user.
    #[error("Invoice not found")]
    NotFound { invoice_id: RecordId },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "INVOICE_NOT_FOUND",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors produced by the authentication gate
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },
}

impl RequestError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        RequestError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        RequestError::Forbidden {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the document store
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// The store is unreachable
    #[error("{backend} connection error: {message}")]
    ConnectionError { backend: String, message: String },

    /// The store rejected or failed the operation
    #[error("{backend} failed to {operation}: {message}")]
    OperationFailed {
        backend: String,
        operation: String,
        message: String,
    },

    /// A stored document could not be mapped to or from an invoice
    #[error("{backend} serialization error: {message}")]
    Serialization { backend: String, message: String },
}

impl StorageError {
    pub fn operation(
        backend: impl Into<String>,
        operation: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        StorageError::OperationFailed {
            backend: backend.into(),
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn serialization(backend: impl Into<String>, message: impl ToString) -> Self {
        StorageError::Serialization {
            backend: backend.into(),
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration loading
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result alias used across service and handlers
pub type ApiResult<T> = Result<T, ApiError>;
