use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use leafline_core::error::{self, ApiError, CoreError};

/// Internal error type that converts to structured API responses.
#[derive(Debug)]
pub enum AppError {
    /// Validation error (422)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
    /// Wraps a domain error from `leafline_core::error::CoreError`.
    Core(CoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id: Some(request_id),
                    docs_hint,
                },
            ),
            AppError::Core(core_err) => {
                let status = match &core_err {
                    CoreError::ImageValidation { .. } | CoreError::OcrFailure => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    CoreError::ReviewNotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Unexpected(_) => {
                        tracing::error!(error = %core_err, "unexpected error");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };

                let message = match &core_err {
                    CoreError::Unexpected(_) => "An internal error occurred".to_string(),
                    other => other.to_string(),
                };

                (
                    status,
                    ApiError {
                        error: core_err.code().to_string(),
                        message,
                        field: None,
                        received: None,
                        request_id: Some(request_id),
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}
