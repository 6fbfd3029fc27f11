use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use leafline_core::model::{CorrectionInput, FinalEnvelope};
use leafline_mcp::reconciler;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/review/{request_id}", post(submit_review_correction))
}

/// Submit human corrections for the uncertain items of a pending review,
/// producing the `FinalEnvelope` that would otherwise never be reached.
#[utoipa::path(
    post,
    path = "/v1/review/{request_id}",
    params(("request_id" = String, Path, description = "Pending review id returned by POST /v1/menu/analyze")),
    request_body = CorrectionInput,
    responses(
        (status = 200, description = "Reconciled classification", body = FinalEnvelope),
        (status = 404, description = "No pending review for this request_id", body = leafline_core::error::ApiError),
    ),
    tag = "review"
)]
pub async fn submit_review_correction(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    AppJson(body): AppJson<CorrectionInput>,
) -> Result<impl IntoResponse, AppError> {
    let result = reconciler::reconcile(&state.engine.review_store, &request_id, &body.corrections)?;
    Ok(axum::Json(result))
}
