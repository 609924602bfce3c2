//! Error types for the notifications domain.

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// Malformed address or OTP; nothing was sent.
    #[error("Invalid verification request: {0}")]
    InvalidRequest(String),

    #[error("Template rendering error: {0}")]
    TemplateError(String),

    /// Raised by an `EmailProvider`; the service turns it into `DispatchFailed`.
    #[error("Email provider error: {0}")]
    ProviderError(String),

    /// The transport rejected or failed the send. Carries the transport detail.
    #[error("An error occurred while sending the email. Error Details: {0}")]
    DispatchFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<handlebars::RenderError> for NotificationError {
    fn from(err: handlebars::RenderError) -> Self {
        NotificationError::TemplateError(err.to_string())
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        let message = err.to_string();
        match err {
            NotificationError::InvalidRequest(_) => AppError::BadRequest(message),
            NotificationError::TemplateError(_)
            | NotificationError::ProviderError(_)
            | NotificationError::DispatchFailed(_)
            | NotificationError::ConfigError(_) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_dispatch_failure_message() {
        let err = NotificationError::DispatchFailed("connection refused".into());
        assert_eq!(
            err.to_string(),
            "An error occurred while sending the email. Error Details: connection refused"
        );
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_request_is_400() {
        let err = NotificationError::InvalidRequest("otp".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
