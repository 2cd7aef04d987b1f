use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::IntakeError;
use crate::session::TransitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Pipeline failures are not errors at this level: they are part of the
/// session and rendered as its Failed view.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload could not be read: {0}")]
    UploadRead(String),

    #[error("Conflict: {0}")]
    Conflict(#[from] TransitionError),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        if err.is_validation() {
            AppError::Validation(err.user_message())
        } else {
            AppError::UploadRead(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UploadRead(msg) => {
                tracing::warn!("Upload read error: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "UPLOAD_READ_ERROR",
                    "The uploaded file could not be read".to_string(),
                )
            }
            AppError::Conflict(e) => (StatusCode::CONFLICT, "CONFLICT", e.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::VALIDATION_MESSAGE;

    #[test]
    fn test_validation_intake_error_maps_to_validation() {
        let err: AppError = IntakeError::TooLarge.into();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, VALIDATION_MESSAGE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_intake_error_maps_to_upload_read() {
        let err: AppError = IntakeError::Read("stream closed".into()).into();
        assert!(matches!(err, AppError::UploadRead(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_busy_session_is_conflict() {
        let response = AppError::from(TransitionError::Busy).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
