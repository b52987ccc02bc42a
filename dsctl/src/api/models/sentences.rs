//! API request/response models for the sentence dataset.

use crate::db::models::sentences::{DatasetStatsDBResponse, QualityBreakdownDBResponse, SentenceDBResponse};
use crate::types::SentenceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_SOURCE: &str = "manual";

// Request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentenceCreate {
    #[schema(example = "Magacaygu waa Cali.")]
    pub text: String,
    pub translation: Option<String>,
    /// Overrides the detected dialect when present
    pub dialect: Option<String>,
    /// Defaults to `manual`
    pub source: Option<String>,
    /// Free-form JSON object, defaults to `{}`
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSentencesQuery {
    /// Maximum number of sentences to return (default 10, clamped to the configured maximum)
    pub limit: Option<i64>,
    /// Only return sentences with this validation state
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub validated: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateQuery {
    /// Also mark the sentence as scholar-approved
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub scholar_approved: bool,
}

/// Query-string booleans: `true/false`, `1/0`, `yes/no`, `on/off`, `t/f`, `y/n`, any case.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid boolean `{raw}`")))
}

fn deserialize_optional_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_flag(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid boolean `{raw}`"))),
        None => Ok(None),
    }
}

// Response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentenceCreateResponse {
    pub id: SentenceId,
    pub message: String,
    pub quality_score: f64,
    pub dialect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentenceResponse {
    pub id: SentenceId,
    pub text: String,
    pub translation: Option<String>,
    pub dialect: String,
    /// Overall quality score captured at submission
    pub quality_score: f64,
    pub source: Option<String>,
    pub validated: bool,
    pub scholar_approved: bool,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
}

impl From<SentenceDBResponse> for SentenceResponse {
    fn from(sentence: SentenceDBResponse) -> Self {
        Self {
            id: sentence.id,
            text: sentence.text,
            translation: sentence.translation,
            dialect: sentence.dialect,
            quality_score: sentence.quality_score,
            source: sentence.source,
            validated: sentence.validated,
            scholar_approved: sentence.scholar_approved,
            created_at: sentence.created_at,
            metadata: sentence.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentenceListResponse {
    pub sentences: Vec<SentenceResponse>,
}

/// Sub-scores stored with a sentence at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QualityBreakdownResponse {
    /// Length sub-score
    pub accuracy_score: f64,
    /// Character diversity sub-score
    pub cultural_score: f64,
    /// Punctuation structure sub-score
    pub grammar_score: f64,
    /// Word complexity sub-score
    pub completeness_score: f64,
    pub overall_score: f64,
    pub validator_notes: Option<String>,
}

impl From<QualityBreakdownDBResponse> for QualityBreakdownResponse {
    fn from(breakdown: QualityBreakdownDBResponse) -> Self {
        Self {
            accuracy_score: breakdown.accuracy_score,
            cultural_score: breakdown.cultural_score,
            grammar_score: breakdown.grammar_score,
            completeness_score: breakdown.completeness_score,
            overall_score: breakdown.overall_score,
            validator_notes: breakdown.validator_notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentenceDetailResponse {
    #[serde(flatten)]
    pub sentence: SentenceResponse,
    pub quality_metrics: Option<QualityBreakdownResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub total_sentences: i64,
    pub validated_sentences: i64,
    pub scholar_approved: i64,
    /// Mean quality score, one decimal place; `0` for an empty dataset
    pub average_quality: f64,
    /// Sentence count per dialect label
    pub dialects: BTreeMap<String, i64>,
    pub last_updated: DateTime<Utc>,
}

impl From<DatasetStatsDBResponse> for StatsResponse {
    fn from(stats: DatasetStatsDBResponse) -> Self {
        Self {
            total_sentences: stats.total,
            validated_sentences: stats.validated_count,
            scholar_approved: stats.scholar_approved_count,
            average_quality: crate::scoring::round1(stats.average_quality),
            dialects: stats.dialect_histogram,
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        for raw in ["true", "True", "1", "yes", "ON", "t", "y"] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "FALSE", "0", "no", "off", "f", "n"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
