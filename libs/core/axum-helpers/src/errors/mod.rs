pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response body.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Product 65f1c0ffee0000000000abcd not found",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details (per-field validation errors, store diagnostics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details,
        }
    }
}

/// Application error type that converts into an HTTP response.
///
/// Anything caused by client input maps to 400/404; store failures map to 500.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Status, error code, message and details for this error.
    ///
    /// Logging happens here so every conversion path records the integer code.
    fn parts(self) -> (StatusCode, ErrorCode, String, Option<Value>) {
        match self {
            AppError::JsonExtractorRejection(e) => {
                let code = match e {
                    JsonRejection::JsonSyntaxError(_) => ErrorCode::InvalidJson,
                    _ => ErrorCode::JsonExtraction,
                };
                tracing::warn!(error_code = code.code(), "JSON extraction error: {}", e.body_text());
                // Wrong content type and type mismatches are still the client's fault.
                (StatusCode::BAD_REQUEST, code, e.body_text(), None)
            }
            AppError::QueryExtractorRejection(e) => {
                let code = ErrorCode::InvalidQuery;
                tracing::warn!(error_code = code.code(), "Query extraction error: {}", e.body_text());
                (StatusCode::BAD_REQUEST, code, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                let code = ErrorCode::ValidationError;
                tracing::info!(error_code = code.code(), "Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    code,
                    code.default_message().to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::InvalidId(msg) => {
                let code = ErrorCode::InvalidId;
                tracing::info!(error_code = code.code(), "Invalid id: {}", msg);
                (StatusCode::BAD_REQUEST, code, msg, None)
            }
            AppError::BadRequest(msg) => {
                let code = ErrorCode::BadRequest;
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, code, msg, None)
            }
            AppError::NotFound(msg) => {
                let code = ErrorCode::NotFound;
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, code, msg, None)
            }
            AppError::Database(diagnostic) => {
                let code = ErrorCode::DatabaseError;
                tracing::error!(error_code = code.code(), "Database error: {}", diagnostic);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    code.default_message().to_string(),
                    Some(json!(diagnostic)),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();
        (status, Json(ErrorResponse::new(code, message, details))).into_response()
    }
}

/// Render validator errors as `{ field: [{code, message, params}] }`.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<Value> = errors
                .iter()
                .map(|err| {
                    json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(fields)
}
