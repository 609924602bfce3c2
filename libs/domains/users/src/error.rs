use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User with ID {0} not found.")]
    NotFound(i32),

    /// Identifier mismatch or malformed input, rejected before touching the store
    #[error("{0}")]
    InvalidArgument(String),

    /// Write lost a race against another writer; the record still exists
    #[error("User with ID {0} was modified by another request.")]
    ConcurrencyConflict(i32),

    /// Store handle absent or unreachable
    #[error("User store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::NotFound(_) => AppError::NotFound(message),
            UserError::InvalidArgument(_) => AppError::BadRequest(message),
            UserError::ConcurrencyConflict(_) => AppError::Conflict(message),
            UserError::StoreUnavailable(_) => AppError::ServiceUnavailable(message),
            UserError::Internal(_) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
