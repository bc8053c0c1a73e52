use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),

    /// The request was cancelled or ran past its deadline
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl From<DbErr> for TodoError {
    fn from(err: DbErr) -> Self {
        TodoError::Internal(format!("Database error: {}", err))
    }
}

/// Convert TodoError to AppError for standardized error responses
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(msg) => AppError::BadRequest(msg),
            TodoError::NotFound(id) => AppError::NotFound(format!("Todo {} not found", id)),
            TodoError::Internal(msg) => AppError::InternalServerError(msg),
            TodoError::Cancelled(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TodoError::Validation("invalid size".into()), StatusCode::BAD_REQUEST),
            (TodoError::NotFound(9), StatusCode::NOT_FOUND),
            (TodoError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (TodoError::Cancelled("deadline".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_db_error_becomes_internal() {
        let err: TodoError = DbErr::Custom("relation \"todos\" does not exist".into()).into();
        assert!(matches!(err, TodoError::Internal(ref m) if m.starts_with("Database error")));
    }
}
