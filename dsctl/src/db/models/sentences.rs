//! Store models for sentences and their quality breakdown.

use crate::types::SentenceId;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Store request for inserting a sentence.
///
/// `dialect` is already resolved: either the caller's override or the detected label.
#[derive(Debug, Clone)]
pub struct SentenceCreateDBRequest {
    pub text: String,
    pub translation: Option<String>,
    pub dialect: String,
    pub source: Option<String>,
    pub metadata: serde_json::Value,
}

/// Sub-scores persisted with a sentence at insertion time.
///
/// Column names follow the review rubric: accuracy holds the length sub-score, cultural the
/// character diversity, grammar the punctuation structure and completeness the word complexity.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityBreakdownCreateDBRequest {
    pub accuracy_score: f64,
    pub cultural_score: f64,
    pub grammar_score: f64,
    pub completeness_score: f64,
    pub overall_score: f64,
}

impl From<&crate::scoring::QualityMetrics> for QualityBreakdownCreateDBRequest {
    fn from(metrics: &crate::scoring::QualityMetrics) -> Self {
        Self {
            accuracy_score: metrics.length_score,
            cultural_score: metrics.character_diversity,
            grammar_score: metrics.structure_score,
            completeness_score: metrics.complexity_score,
            overall_score: metrics.overall_score,
        }
    }
}

/// Store response for a sentence
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceDBResponse {
    pub id: SentenceId,
    pub text: String,
    pub translation: Option<String>,
    pub dialect: String,
    pub quality_score: f64,
    pub source: Option<String>,
    pub validated: bool,
    pub scholar_approved: bool,
    pub created_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

/// Store response for a sentence's quality breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct QualityBreakdownDBResponse {
    pub id: i64,
    pub sentence_id: SentenceId,
    pub accuracy_score: f64,
    pub cultural_score: f64,
    pub grammar_score: f64,
    pub completeness_score: f64,
    pub overall_score: f64,
    pub validator_notes: Option<String>,
}

/// Filter for listing sentences
#[derive(Debug, Clone)]
pub struct SentenceFilter {
    pub limit: i64,
    pub validated: Option<bool>,
}

impl SentenceFilter {
    pub fn new(limit: i64, validated: Option<bool>) -> Self {
        Self { limit, validated }
    }
}

/// Aggregate dataset statistics
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStatsDBResponse {
    pub total: i64,
    pub validated_count: i64,
    pub scholar_approved_count: i64,
    /// Mean `quality_score`, `0` for an empty dataset
    pub average_quality: f64,
    pub dialect_histogram: BTreeMap<String, i64>,
}
