use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use leafline_core::error::CoreError;
use leafline_core::model::ClassifyOutcome;
use leafline_mcp::parser;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeMenuRequest {
    /// 1-5 raw OCR text blocks, one per photographed menu page.
    pub ocr_texts: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/menu/analyze", post(analyze_menu))
}

/// Parse OCR text into dishes and classify each as vegetarian or not.
///
/// Returns a `FinalEnvelope` when every dish is confidently classified, or a
/// `NeedsReviewEnvelope` naming a `request_id` to resolve via
/// `POST /v1/review/{request_id}` when at least one dish is uncertain.
#[utoipa::path(
    post,
    path = "/v1/menu/analyze",
    request_body = AnalyzeMenuRequest,
    responses(
        (status = 200, description = "Classification outcome", body = ClassifyOutcome),
        (status = 422, description = "Validation failed or OCR produced no usable text", body = leafline_core::error::ApiError),
    ),
    tag = "menu"
)]
pub async fn analyze_menu(
    State(state): State<AppState>,
    AppJson(body): AppJson<AnalyzeMenuRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.ocr_texts.is_empty() || body.ocr_texts.len() > 5 {
        return Err(AppError::Validation {
            message: format!(
                "expected 1-5 images, received {}",
                body.ocr_texts.len()
            ),
            field: Some("ocr_texts".to_string()),
            received: Some(serde_json::json!(body.ocr_texts.len())),
            docs_hint: Some("Submit between 1 and 5 OCR text blocks.".to_string()),
        });
    }

    if is_all_whitespace(&body.ocr_texts) {
        return Err(AppError::Core(CoreError::OcrFailure));
    }

    let items = parser::parse(&body.ocr_texts);
    let outcome: ClassifyOutcome = state.engine.coordinator.analyze(&items).await;

    Ok(axum::Json(outcome))
}

/// True when every OCR text block is empty or whitespace-only, i.e. OCR
/// found nothing to parse across any of the submitted images.
fn is_all_whitespace(ocr_texts: &[String]) -> bool {
    ocr_texts.iter().all(|text| text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_whitespace_texts_are_detected() {
        assert!(is_all_whitespace(&["   ".to_string(), "".to_string()]));
        assert!(is_all_whitespace(&["\n\t".to_string()]));
    }

    #[test]
    fn any_non_whitespace_text_is_not_all_whitespace() {
        assert!(!is_all_whitespace(&[
            "   ".to_string(),
            "Greek Salad $9".to_string()
        ]));
    }
}
