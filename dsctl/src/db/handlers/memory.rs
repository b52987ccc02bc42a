//! In-process stores backing the `memory` database type.
//!
//! State lives for the life of the process. Charges hold the account's map entry for the whole
//! check-log-increment step, which gives the same per-account serialization as the row lock the
//! Postgres store takes.

use crate::crypto::generate_api_key;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{AccountStore, DatasetStore},
    models::{
        accounts::{
            AccountCreateDBRequest, AccountDBResponse, ChargeOutcome, ChargeReceipt, UsageRecordDBResponse, requests_limit_for_plan,
        },
        sentences::{
            DatasetStatsDBResponse, QualityBreakdownCreateDBRequest, QualityBreakdownDBResponse, SentenceCreateDBRequest,
            SentenceDBResponse, SentenceFilter,
        },
    },
};
use crate::types::{AccountId, SentenceId, abbrev_uuid};
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// [`AccountStore`] over concurrent hash maps.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<AccountId, AccountDBResponse>,
    by_email: DashMap<String, AccountId>,
    by_key: DashMap<String, AccountId>,
    usage: DashMap<AccountId, Vec<UsageRecordDBResponse>>,
    next_usage_id: AtomicI64,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    #[instrument(skip(self, request), fields(plan = %request.plan), err)]
    async fn create(&self, request: &AccountCreateDBRequest) -> Result<AccountDBResponse> {
        // The email entry stays locked until the account is fully registered
        let Entry::Vacant(slot) = self.by_email.entry(request.email.clone()) else {
            return Err(DbError::DuplicateEmail);
        };

        let account = AccountDBResponse {
            id: uuid::Uuid::new_v4(),
            email: request.email.clone(),
            api_key: generate_api_key(),
            plan: request.plan.clone(),
            requests_used: 0,
            requests_limit: requests_limit_for_plan(&request.plan),
            is_active: true,
            created_at: Utc::now(),
        };

        self.by_key.insert(account.api_key.clone(), account.id);
        self.accounts.insert(account.id, account.clone());
        slot.insert(account.id);

        debug!(account_id = %abbrev_uuid(&account.id), "Account registered");
        Ok(account)
    }

    #[instrument(skip_all, err)]
    async fn find_by_key(&self, api_key: &str) -> Result<Option<AccountDBResponse>> {
        let Some(id) = self.by_key.get(api_key).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.accounts.get(&id).map(|account| account.clone()))
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: AccountId) -> Result<Option<AccountDBResponse>> {
        Ok(self.accounts.get(&id).map(|account| account.clone()))
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn charge(&self, id: AccountId, endpoint: &str) -> Result<ChargeOutcome> {
        let Some(mut account) = self.accounts.get_mut(&id) else {
            return Ok(ChargeOutcome::Inactive);
        };

        if !account.is_active {
            return Ok(ChargeOutcome::Inactive);
        }
        if account.requests_used >= account.requests_limit {
            return Ok(ChargeOutcome::QuotaExceeded {
                requests_limit: account.requests_limit,
            });
        }

        let record = UsageRecordDBResponse {
            id: self.next_usage_id.fetch_add(1, Ordering::Relaxed) + 1,
            account_id: id,
            endpoint: endpoint.to_string(),
            timestamp: Utc::now(),
        };
        self.usage.entry(id).or_default().push(record);

        let receipt = ChargeReceipt {
            account_id: id,
            plan: account.plan.clone(),
            requests_used: account.requests_used,
            requests_limit: account.requests_limit,
        };
        account.requests_used += 1;

        Ok(ChargeOutcome::Charged(receipt))
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn deactivate(&self, id: AccountId) -> Result<()> {
        let mut account = self.accounts.get_mut(&id).ok_or(DbError::NotFound)?;
        account.is_active = false;
        Ok(())
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn list_usage(&self, id: AccountId, limit: i64) -> Result<Vec<UsageRecordDBResponse>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .usage
            .get(&id)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct Dataset {
    sentences: BTreeMap<SentenceId, SentenceDBResponse>,
    breakdowns: HashMap<SentenceId, QualityBreakdownDBResponse>,
    texts: HashMap<String, SentenceId>,
    next_sentence_id: SentenceId,
    next_breakdown_id: i64,
}

/// [`DatasetStore`] over a single lock-guarded dataset.
#[derive(Default)]
pub struct InMemoryDatasetStore {
    dataset: RwLock<Dataset>,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatasetStore for InMemoryDatasetStore {
    #[instrument(skip(self, request, breakdown), fields(dialect = %request.dialect), err)]
    async fn insert(
        &self,
        request: &SentenceCreateDBRequest,
        breakdown: &QualityBreakdownCreateDBRequest,
    ) -> Result<SentenceDBResponse> {
        let mut dataset = self.dataset.write().await;

        if dataset.texts.contains_key(&request.text) {
            return Err(DbError::DuplicateText);
        }

        dataset.next_sentence_id += 1;
        dataset.next_breakdown_id += 1;
        let id = dataset.next_sentence_id;

        let sentence = SentenceDBResponse {
            id,
            text: request.text.clone(),
            translation: request.translation.clone(),
            dialect: request.dialect.clone(),
            quality_score: breakdown.overall_score,
            source: request.source.clone(),
            validated: false,
            scholar_approved: false,
            created_at: Utc::now(),
            metadata: request.metadata.clone(),
        };
        let stored_breakdown = QualityBreakdownDBResponse {
            id: dataset.next_breakdown_id,
            sentence_id: id,
            accuracy_score: breakdown.accuracy_score,
            cultural_score: breakdown.cultural_score,
            grammar_score: breakdown.grammar_score,
            completeness_score: breakdown.completeness_score,
            overall_score: breakdown.overall_score,
            validator_notes: None,
        };

        dataset.texts.insert(sentence.text.clone(), id);
        dataset.breakdowns.insert(id, stored_breakdown);
        dataset.sentences.insert(id, sentence.clone());

        Ok(sentence)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: SentenceId) -> Result<Option<SentenceDBResponse>> {
        Ok(self.dataset.read().await.sentences.get(&id).cloned())
    }

    #[instrument(skip(self), err)]
    async fn get_quality_breakdown(&self, id: SentenceId) -> Result<Option<QualityBreakdownDBResponse>> {
        Ok(self.dataset.read().await.breakdowns.get(&id).cloned())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, validated = ?filter.validated), err)]
    async fn list(&self, filter: &SentenceFilter) -> Result<Vec<SentenceDBResponse>> {
        let dataset = self.dataset.read().await;

        // BTreeMap iteration is already id-ascending, so a stable sort keeps the id tie-break
        let mut sentences: Vec<_> = dataset
            .sentences
            .values()
            .filter(|s| filter.validated.is_none_or(|validated| s.validated == validated))
            .collect();
        sentences.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));

        let limit = usize::try_from(filter.limit).unwrap_or(0);
        Ok(sentences.into_iter().take(limit).cloned().collect())
    }

    #[instrument(skip(self), err)]
    async fn validate(&self, id: SentenceId, scholar_approved: bool) -> Result<()> {
        let mut dataset = self.dataset.write().await;
        let sentence = dataset.sentences.get_mut(&id).ok_or(DbError::NotFound)?;
        sentence.validated = true;
        sentence.scholar_approved = scholar_approved;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: SentenceId) -> Result<()> {
        let mut dataset = self.dataset.write().await;
        let sentence = dataset.sentences.remove(&id).ok_or(DbError::NotFound)?;
        dataset.texts.remove(&sentence.text);
        dataset.breakdowns.remove(&id);
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn stats(&self) -> Result<DatasetStatsDBResponse> {
        let dataset = self.dataset.read().await;

        let mut stats = DatasetStatsDBResponse {
            total: 0,
            validated_count: 0,
            scholar_approved_count: 0,
            average_quality: 0.0,
            dialect_histogram: BTreeMap::new(),
        };
        let mut quality_sum = 0.0;

        for sentence in dataset.sentences.values() {
            stats.total += 1;
            stats.validated_count += i64::from(sentence.validated);
            stats.scholar_approved_count += i64::from(sentence.scholar_approved);
            quality_sum += sentence.quality_score;
            *stats.dialect_histogram.entry(sentence.dialect.clone()).or_default() += 1;
        }

        if stats.total > 0 {
            stats.average_quality = quality_sum / stats.total as f64;
        }
        Ok(stats)
    }
}
