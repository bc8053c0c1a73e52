use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{AppError, ErrorCode, error_response};

/// Handler for 404 Not Found errors.
///
/// This can be used as a fallback handler in your router.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource was not found".to_string(),
        ErrorCode::NotFound,
    )
}

/// Handler for 405 Method Not Allowed errors.
///
/// Install it as a `MethodRouter` fallback so unsupported verbs get the
/// structured body instead of axum's empty 405.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}
