use serde::Serialize;
use utoipa::ToSchema;

/// Structured error response — designed for agents, not humans.
/// Every error contains enough information for an agent to understand
/// what went wrong and how to fix it.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "not_found")
    pub error: String,
    /// Human/agent-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const UNPROCESSABLE: &str = "unprocessable";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Domain error taxonomy for the menu classification core.
///
/// `LlmUnavailable` and `VectorIndexUnavailable` are deliberately absent here:
/// per the propagation policy, those failures are absorbed at the point of
/// occurrence and never escalate into a surfaced error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("expected 1-5 images, received {count}")]
    ImageValidation { count: usize },

    #[error("OCR produced no usable text")]
    OcrFailure,

    #[error("no pending review for request_id {request_id}")]
    ReviewNotFound { request_id: String },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::ImageValidation { .. } => codes::VALIDATION_FAILED,
            CoreError::OcrFailure => codes::UNPROCESSABLE,
            CoreError::ReviewNotFound { .. } => codes::NOT_FOUND,
            CoreError::Unexpected(_) => codes::INTERNAL_ERROR,
        }
    }
}
