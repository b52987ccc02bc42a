//! API request/response models for text analysis.

use crate::db::models::accounts::ChargeReceipt;
use crate::scoring::{DialectDetection, QualityMetrics, Scorecard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    #[schema(example = "Waa wanaagsan tahay.")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    pub text: String,
    pub quality_metrics: QualityMetrics,
    pub dialect_detection: DialectDetection,
    /// Always `processed`; analysis does not store the text
    pub validation_status: String,
    pub timestamp: DateTime<Utc>,
    pub user_plan: String,
    /// Requests left after this one
    pub requests_remaining: i64,
}

impl AnalyzeResponse {
    pub fn new(text: String, scorecard: Scorecard, receipt: &ChargeReceipt) -> Self {
        Self {
            text,
            quality_metrics: scorecard.quality,
            dialect_detection: scorecard.dialect,
            validation_status: "processed".to_string(),
            timestamp: Utc::now(),
            user_plan: receipt.plan.clone(),
            requests_remaining: receipt.requests_limit - receipt.requests_used - 1,
        }
    }
}
