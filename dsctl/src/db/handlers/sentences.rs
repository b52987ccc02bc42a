use crate::db::{
    errors::{DbError, Result},
    handlers::repository::DatasetStore,
    models::sentences::{
        DatasetStatsDBResponse, QualityBreakdownCreateDBRequest, QualityBreakdownDBResponse, SentenceCreateDBRequest,
        SentenceDBResponse, SentenceFilter,
    },
};
use crate::types::SentenceId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use tracing::instrument;

// Database entity model for a sentence
#[derive(Debug, Clone, FromRow)]
struct Sentence {
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

impl From<Sentence> for SentenceDBResponse {
    fn from(sentence: Sentence) -> Self {
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

#[derive(Debug, Clone, FromRow)]
struct QualityBreakdown {
    pub id: i64,
    pub sentence_id: SentenceId,
    pub accuracy_score: f64,
    pub cultural_score: f64,
    pub grammar_score: f64,
    pub completeness_score: f64,
    pub overall_score: f64,
    pub validator_notes: Option<String>,
}

impl From<QualityBreakdown> for QualityBreakdownDBResponse {
    fn from(breakdown: QualityBreakdown) -> Self {
        Self {
            id: breakdown.id,
            sentence_id: breakdown.sentence_id,
            accuracy_score: breakdown.accuracy_score,
            cultural_score: breakdown.cultural_score,
            grammar_score: breakdown.grammar_score,
            completeness_score: breakdown.completeness_score,
            overall_score: breakdown.overall_score,
            validator_notes: breakdown.validator_notes,
        }
    }
}

#[derive(Debug, FromRow)]
struct Totals {
    pub total: i64,
    pub validated_count: i64,
    pub scholar_approved_count: i64,
    pub average_quality: f64,
}

const SENTENCE_COLUMNS: &str =
    "id, text, translation, dialect, quality_score, source, validated, scholar_approved, created_at, metadata";

/// Postgres-backed [`DatasetStore`].
#[derive(Clone)]
pub struct PgDatasetStore {
    pool: PgPool,
}

impl PgDatasetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DatasetStore for PgDatasetStore {
    #[instrument(skip(self, request, breakdown), fields(dialect = %request.dialect), err)]
    async fn insert(
        &self,
        request: &SentenceCreateDBRequest,
        breakdown: &QualityBreakdownCreateDBRequest,
    ) -> Result<SentenceDBResponse> {
        let mut tx = self.pool.begin().await?;

        let sentence = sqlx::query_as::<_, Sentence>(&format!(
            "INSERT INTO sentences (text, translation, dialect, quality_score, source, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SENTENCE_COLUMNS}"
        ))
        .bind(&request.text)
        .bind(&request.translation)
        .bind(&request.dialect)
        .bind(breakdown.overall_score)
        .bind(&request.source)
        .bind(&request.metadata)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO quality_metrics
                 (sentence_id, accuracy_score, cultural_score, grammar_score, completeness_score, overall_score)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(sentence.id)
        .bind(breakdown.accuracy_score)
        .bind(breakdown.cultural_score)
        .bind(breakdown.grammar_score)
        .bind(breakdown.completeness_score)
        .bind(breakdown.overall_score)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(sentence.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: SentenceId) -> Result<Option<SentenceDBResponse>> {
        let sentence = sqlx::query_as::<_, Sentence>(&format!("SELECT {SENTENCE_COLUMNS} FROM sentences WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sentence.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn get_quality_breakdown(&self, id: SentenceId) -> Result<Option<QualityBreakdownDBResponse>> {
        let breakdown = sqlx::query_as::<_, QualityBreakdown>(
            "SELECT id, sentence_id, accuracy_score, cultural_score, grammar_score, completeness_score,
                    overall_score, validator_notes
             FROM quality_metrics WHERE sentence_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(breakdown.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, validated = ?filter.validated), err)]
    async fn list(&self, filter: &SentenceFilter) -> Result<Vec<SentenceDBResponse>> {
        let sentences = sqlx::query_as::<_, Sentence>(&format!(
            "SELECT {SENTENCE_COLUMNS} FROM sentences
             WHERE ($1::BOOLEAN IS NULL OR validated = $1)
             ORDER BY quality_score DESC, id ASC
             LIMIT $2"
        ))
        .bind(filter.validated)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sentences.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn validate(&self, id: SentenceId, scholar_approved: bool) -> Result<()> {
        let result = sqlx::query("UPDATE sentences SET validated = TRUE, scholar_approved = $2 WHERE id = $1")
            .bind(id)
            .bind(scholar_approved)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: SentenceId) -> Result<()> {
        // quality_metrics rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM sentences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn stats(&self) -> Result<DatasetStatsDBResponse> {
        let mut tx = self.pool.begin().await?;

        // Both reads see one snapshot
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let totals = sqlx::query_as::<_, Totals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE validated) AS validated_count,
                    COUNT(*) FILTER (WHERE scholar_approved) AS scholar_approved_count,
                    COALESCE(AVG(quality_score), 0)::DOUBLE PRECISION AS average_quality
             FROM sentences",
        )
        .fetch_one(&mut *tx)
        .await?;

        let histogram: Vec<(String, i64)> = sqlx::query_as("SELECT dialect, COUNT(*) FROM sentences GROUP BY dialect")
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DatasetStatsDBResponse {
            total: totals.total,
            validated_count: totals.validated_count,
            scholar_approved_count: totals.scholar_approved_count,
            average_quality: totals.average_quality,
            dialect_histogram: histogram.into_iter().collect::<BTreeMap<_, _>>(),
        })
    }
}
