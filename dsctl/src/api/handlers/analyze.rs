//! HTTP handler for metered text analysis.

use crate::{
    AppState,
    api::models::analyze::{AnalyzeRequest, AnalyzeResponse},
    auth::bearer::BearerKey,
    errors::{Error, Result},
    scoring,
    types::endpoints,
};
use axum::{extract::State, response::Json};

/// Score a text without storing it
#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analysis",
    summary = "Analyze text",
    description = "Compute quality metrics and a dialect guess for the text. Each successful call consumes one \
                   request from the key's quota; rejected calls consume nothing.",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalyzeResponse),
        (status = 400, description = "Text is empty or whitespace-only", body = crate::errors::ErrorBody),
        (status = 401, description = "Missing, unknown or inactive API key", body = crate::errors::ErrorBody),
        (status = 429, description = "Request quota exhausted", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn analyze(
    State(state): State<AppState>,
    BearerKey(api_key): BearerKey,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    if request.text.trim().is_empty() {
        // key and quota errors still take precedence over the empty-input error
        state.access.verify(&api_key).await?;
        return Err(Error::EmptyInput { field: "text" });
    }

    let receipt = state.access.authenticate_and_charge(&api_key, endpoints::ANALYZE).await?;
    let scorecard = scoring::score(&request.text);

    Ok(Json(AnalyzeResponse::new(request.text, scorecard, &receipt)))
}
