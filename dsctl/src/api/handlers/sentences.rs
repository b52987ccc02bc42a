//! HTTP handlers for the sentence dataset.

use crate::{
    AppState,
    api::models::sentences::{
        DEFAULT_SOURCE, ListSentencesQuery, MessageResponse, SentenceCreate, SentenceCreateResponse, SentenceDetailResponse,
        SentenceListResponse, StatsResponse, ValidateQuery,
    },
    db::{
        errors::DbError,
        models::sentences::{QualityBreakdownCreateDBRequest, SentenceCreateDBRequest, SentenceFilter},
    },
    errors::{Error, Result},
    scoring,
    types::SentenceId,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use metrics::counter;

fn sentence_not_found(id: SentenceId) -> Error {
    Error::NotFound {
        resource: "Sentence".to_string(),
        id: id.to_string(),
    }
}

/// Submit a sentence to the dataset
#[utoipa::path(
    post,
    path = "/sentences",
    tag = "sentences",
    summary = "Add sentence",
    description = "Score a sentence and store it, unvalidated, with its quality breakdown. \
                   A supplied `dialect` is stored instead of the detected one. This endpoint does not require an API key.",
    request_body = SentenceCreate,
    responses(
        (status = 200, description = "Sentence stored", body = SentenceCreateResponse),
        (status = 400, description = "Text is empty or already in the dataset", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_sentence(
    State(state): State<AppState>,
    Json(data): Json<SentenceCreate>,
) -> Result<Json<SentenceCreateResponse>> {
    if data.text.trim().is_empty() {
        return Err(Error::EmptyInput { field: "text" });
    }

    let scorecard = scoring::score(&data.text);
    let dialect = data
        .dialect
        .unwrap_or_else(|| scorecard.dialect.dialect.label().to_string());

    let request = SentenceCreateDBRequest {
        text: data.text,
        translation: data.translation,
        dialect,
        source: Some(data.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string())),
        metadata: data.metadata.unwrap_or_else(|| serde_json::json!({})),
    };
    let sentence = state
        .dataset
        .insert(&request, &QualityBreakdownCreateDBRequest::from(&scorecard.quality))
        .await?;

    counter!("dsctl_sentences_inserted_total").increment(1);

    Ok(Json(SentenceCreateResponse {
        id: sentence.id,
        message: "Sentence added successfully".to_string(),
        quality_score: sentence.quality_score,
        dialect: sentence.dialect,
    }))
}

/// List sentences by quality
#[utoipa::path(
    get,
    path = "/sentences",
    tag = "sentences",
    summary = "List sentences",
    description = "Sentences ordered by descending quality score, ties broken by ascending id.",
    params(ListSentencesQuery),
    responses(
        (status = 200, description = "Matching sentences", body = SentenceListResponse),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_sentences(
    State(state): State<AppState>,
    Query(query): Query<ListSentencesQuery>,
) -> Result<Json<SentenceListResponse>> {
    let limit = state.config.sentences.clamp_limit(query.limit);
    let sentences = state.dataset.list(&SentenceFilter::new(limit, query.validated)).await?;

    Ok(Json(SentenceListResponse {
        sentences: sentences.into_iter().map(Into::into).collect(),
    }))
}

/// Get a sentence with its quality breakdown
#[utoipa::path(
    get,
    path = "/sentences/{sentence_id}",
    tag = "sentences",
    summary = "Get sentence",
    params(
        ("sentence_id" = i64, Path, description = "Sentence ID"),
    ),
    responses(
        (status = 200, description = "Sentence details", body = SentenceDetailResponse),
        (status = 404, description = "Sentence not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_sentence(
    State(state): State<AppState>,
    Path(sentence_id): Path<SentenceId>,
) -> Result<Json<SentenceDetailResponse>> {
    let sentence = state
        .dataset
        .get_by_id(sentence_id)
        .await?
        .ok_or_else(|| sentence_not_found(sentence_id))?;
    let breakdown = state.dataset.get_quality_breakdown(sentence_id).await?;

    Ok(Json(SentenceDetailResponse {
        sentence: sentence.into(),
        quality_metrics: breakdown.map(Into::into),
    }))
}

/// Mark a sentence as validated
#[utoipa::path(
    put,
    path = "/sentences/{sentence_id}/validate",
    tag = "sentences",
    summary = "Validate sentence",
    description = "Sets `validated` and, in the same write, `scholar_approved` to the query value (default false).",
    params(
        ("sentence_id" = i64, Path, description = "Sentence ID"),
        ValidateQuery,
    ),
    responses(
        (status = 200, description = "Sentence validated", body = MessageResponse),
        (status = 404, description = "Sentence not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(sentence_id))]
pub async fn validate_sentence(
    State(state): State<AppState>,
    Path(sentence_id): Path<SentenceId>,
    Query(query): Query<ValidateQuery>,
) -> Result<Json<MessageResponse>> {
    tracing::Span::current().record("sentence_id", sentence_id);

    match state.dataset.validate(sentence_id, query.scholar_approved).await {
        Ok(()) => Ok(Json(MessageResponse::new("Sentence validated successfully"))),
        Err(DbError::NotFound) => Err(sentence_not_found(sentence_id)),
        Err(e) => Err(e.into()),
    }
}

/// Delete a sentence and its quality breakdown
#[utoipa::path(
    delete,
    path = "/sentences/{sentence_id}",
    tag = "sentences",
    summary = "Delete sentence",
    params(
        ("sentence_id" = i64, Path, description = "Sentence ID"),
    ),
    responses(
        (status = 200, description = "Sentence deleted", body = MessageResponse),
        (status = 404, description = "Sentence not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(sentence_id))]
pub async fn delete_sentence(
    State(state): State<AppState>,
    Path(sentence_id): Path<SentenceId>,
) -> Result<Json<MessageResponse>> {
    tracing::Span::current().record("sentence_id", sentence_id);

    match state.dataset.delete(sentence_id).await {
        Ok(()) => Ok(Json(MessageResponse::new("Sentence deleted successfully"))),
        Err(DbError::NotFound) => Err(sentence_not_found(sentence_id)),
        Err(e) => Err(e.into()),
    }
}

/// Dataset statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "sentences",
    summary = "Dataset statistics",
    responses(
        (status = 200, description = "Counts, average quality and dialect distribution", body = StatsResponse),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.dataset.stats().await?;
    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use crate::test::utils::{add_sentence, create_test_app};
    use serde_json::{Value, json};

    #[test_log::test(tokio::test)]
    async fn test_create_sentence_with_defaults() {
        let server = create_test_app();

        let response = server.post("/sentences").json(&json!({"text": "Waa wanaagsan tahay."})).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Sentence added successfully");
        assert_eq!(body["dialect"], "Northern Somali");
        let id = body["id"].as_i64().unwrap();

        let detail: Value = server.get(&format!("/sentences/{id}")).await.json();
        assert_eq!(detail["source"], "manual");
        assert_eq!(detail["metadata"], json!({}));
        assert_eq!(detail["validated"], false);
        assert_eq!(detail["scholar_approved"], false);
        assert_eq!(detail["quality_score"], body["quality_score"]);
        assert_eq!(detail["quality_metrics"]["grammar_score"], 25.0);
        assert_eq!(detail["quality_metrics"]["accuracy_score"], 7.5);
        assert_eq!(detail["quality_metrics"]["overall_score"], body["quality_score"]);
    }

    #[test_log::test(tokio::test)]
    async fn test_caller_dialect_overrides_detection() {
        let server = create_test_app();

        let body: Value = server
            .post("/sentences")
            .json(&json!({
                "text": "Waa wanaagsan tahay.",
                "dialect": "Maay",
                "translation": "It is good.",
                "source": "field-recording",
                "metadata": {"speaker": 7}
            }))
            .await
            .json();
        assert_eq!(body["dialect"], "Maay");

        let detail: Value = server.get(&format!("/sentences/{}", body["id"])).await.json();
        assert_eq!(detail["dialect"], "Maay");
        assert_eq!(detail["translation"], "It is good.");
        assert_eq!(detail["source"], "field-recording");
        assert_eq!(detail["metadata"]["speaker"], 7);
    }

    #[test_log::test(tokio::test)]
    async fn test_duplicate_text_rejected() {
        let server = create_test_app();
        add_sentence(&server, "Is ka warran").await;

        let response = server.post("/sentences").json(&json!({"text": "Is ka warran"})).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "duplicate_text");

        let stats: Value = server.get("/stats").await.json();
        assert_eq!(stats["total_sentences"], 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_text_rejected() {
        let server = create_test_app();

        let response = server.post("/sentences").json(&json!({"text": "  "})).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "empty_input");
    }

    #[test_log::test(tokio::test)]
    async fn test_list_orders_filters_and_limits() {
        let server = create_test_app();

        let low = add_sentence(&server, "ab").await;
        let high = add_sentence(&server, "Magacaygu waa Cali, waxaan ku noolahay Hargeysa.").await;
        let mid = add_sentence(&server, "Subax wanaagsan").await;

        let body: Value = server.get("/sentences").await.json();
        let ids: Vec<i64> = body["sentences"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![high, mid, low]);

        server
            .put(&format!("/sentences/{low}/validate"))
            .await
            .assert_status_ok();
        server
            .put(&format!("/sentences/{high}/validate?scholar_approved=true"))
            .await
            .assert_status_ok();

        let body: Value = server.get("/sentences?limit=2&validated=true").await.json();
        let sentences = body["sentences"].as_array().unwrap();
        assert_eq!(sentences.len(), 2);
        assert!(sentences.iter().all(|s| s["validated"] == true));
        assert_eq!(sentences[0]["id"], high);
        assert_eq!(sentences[0]["scholar_approved"], true);
        assert_eq!(sentences[1]["scholar_approved"], false);

        let body: Value = server.get("/sentences?validated=false").await.json();
        assert_eq!(body["sentences"].as_array().unwrap().len(), 1);

        let body: Value = server.get("/sentences?limit=1").await.json();
        assert_eq!(body["sentences"].as_array().unwrap().len(), 1);

        // out-of-range limits are clamped, not rejected
        let body: Value = server.get("/sentences?limit=0").await.json();
        assert!(body["sentences"].as_array().unwrap().is_empty());
        let body: Value = server.get("/sentences?limit=-3").await.json();
        assert!(body["sentences"].as_array().unwrap().is_empty());
        let body: Value = server.get("/sentences?limit=5000").await.json();
        assert_eq!(body["sentences"].as_array().unwrap().len(), 3);
    }

    #[test_log::test(tokio::test)]
    async fn test_validate_missing_sentence() {
        let server = create_test_app();

        let response = server.put("/sentences/404/validate?scholar_approved=true").await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["error"], "not_found");
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_sentence() {
        let server = create_test_app();
        let id = add_sentence(&server, "Nabad gelyo").await;

        let response = server.delete(&format!("/sentences/{id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Sentence deleted successfully");

        server.get(&format!("/sentences/{id}")).await.assert_status_not_found();
        server.delete(&format!("/sentences/{id}")).await.assert_status_not_found();

        // the text can be submitted again once deleted
        add_sentence(&server, "Nabad gelyo").await;
    }

    #[test_log::test(tokio::test)]
    async fn test_stats() {
        let server = create_test_app();

        let empty: Value = server.get("/stats").await.json();
        assert_eq!(empty["total_sentences"], 0);
        assert_eq!(empty["average_quality"], 0.0);
        assert_eq!(empty["dialects"], json!({}));
        assert!(empty["last_updated"].is_string());

        let a = add_sentence(&server, "Waa maxay magacaagu?").await;
        add_sentence(&server, "lacag").await;
        server
            .put(&format!("/sentences/{a}/validate?scholar_approved=true"))
            .await
            .assert_status_ok();

        let stats: Value = server.get("/stats").await.json();
        assert_eq!(stats["total_sentences"], 2);
        assert_eq!(stats["validated_sentences"], 1);
        assert_eq!(stats["scholar_approved"], 1);
        assert_eq!(stats["dialects"]["Northern Somali"], 1);
        assert_eq!(stats["dialects"]["Southern Somali"], 1);

        let average = stats["average_quality"].as_f64().unwrap();
        assert_eq!(average, (average * 10.0).round() / 10.0);
    }

    #[test_log::test(tokio::test)]
    async fn test_boolean_query_spellings() {
        let server = create_test_app();

        let approved = add_sentence(&server, "Subax wanaagsan").await;
        let pending = add_sentence(&server, "Habeen wanaagsan").await;

        server
            .put(&format!("/sentences/{approved}/validate?scholar_approved=1"))
            .await
            .assert_status_ok();
        let detail: Value = server.get(&format!("/sentences/{approved}")).await.json();
        assert_eq!(detail["scholar_approved"], true);

        for (query, expected) in [
            ("validated=1", approved),
            ("validated=yes", approved),
            ("validated=ON", approved),
            ("validated=0", pending),
            ("validated=off", pending),
            ("validated=n", pending),
        ] {
            let body: Value = server.get(&format!("/sentences?{query}")).await.json();
            let sentences = body["sentences"].as_array().unwrap();
            assert_eq!(sentences.len(), 1, "{query}");
            assert_eq!(sentences[0]["id"], expected, "{query}");
        }

        server.get("/sentences?validated=maybe").await.assert_status_bad_request();
    }
}
