use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unmatched paths.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");

    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        format!("No route for {}", uri.path()),
        None,
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}
