//! Store traits for database operations.
//!
//! A store owns its connection handling (a `PgPool`, or in-memory maps) and is the only path to
//! the tables it manages. Request handlers and the access controller hold `Arc<dyn ...>` values
//! and never touch a connection directly.

use crate::db::errors::Result;
use crate::db::models::{
    accounts::{AccountCreateDBRequest, AccountDBResponse, ChargeOutcome, UsageRecordDBResponse},
    sentences::{
        DatasetStatsDBResponse, QualityBreakdownCreateDBRequest, QualityBreakdownDBResponse, SentenceCreateDBRequest,
        SentenceDBResponse, SentenceFilter,
    },
};
use crate::types::{AccountId, SentenceId};

/// Accounts and their append-only usage log.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account with a freshly generated API key and the plan's request limit.
    ///
    /// Fails with [`DbError::DuplicateEmail`](crate::db::errors::DbError::DuplicateEmail) if the
    /// email is already registered.
    async fn create(&self, request: &AccountCreateDBRequest) -> Result<AccountDBResponse>;

    /// Look up an account by its API key.
    async fn find_by_key(&self, api_key: &str) -> Result<Option<AccountDBResponse>>;

    /// Get an account by ID
    async fn get_by_id(&self, id: AccountId) -> Result<Option<AccountDBResponse>>;

    /// Atomically check the quota, log usage for `endpoint` and increment `requests_used`.
    ///
    /// Linearizable with every other `charge` on the same account; either both writes happen or
    /// neither does.
    async fn charge(&self, id: AccountId, endpoint: &str) -> Result<ChargeOutcome>;

    /// Permanently deactivate an account.
    async fn deactivate(&self, id: AccountId) -> Result<()>;

    /// Most recent usage records for an account, newest first.
    async fn list_usage(&self, id: AccountId, limit: i64) -> Result<Vec<UsageRecordDBResponse>>;
}

/// Sentences and their quality breakdowns.
#[async_trait::async_trait]
pub trait DatasetStore: Send + Sync {
    /// Insert a sentence and its quality breakdown in one all-or-nothing step.
    ///
    /// Fails with [`DbError::DuplicateText`](crate::db::errors::DbError::DuplicateText) if the
    /// exact text already exists.
    async fn insert(
        &self,
        request: &SentenceCreateDBRequest,
        breakdown: &QualityBreakdownCreateDBRequest,
    ) -> Result<SentenceDBResponse>;

    /// Get a sentence by ID
    async fn get_by_id(&self, id: SentenceId) -> Result<Option<SentenceDBResponse>>;

    /// Get the quality breakdown written with a sentence
    async fn get_quality_breakdown(&self, id: SentenceId) -> Result<Option<QualityBreakdownDBResponse>>;

    /// List sentences by descending quality score (ties by ascending id)
    async fn list(&self, filter: &SentenceFilter) -> Result<Vec<SentenceDBResponse>>;

    /// Mark a sentence validated and set its scholar approval in the same write.
    async fn validate(&self, id: SentenceId, scholar_approved: bool) -> Result<()>;

    /// Delete a sentence and its quality breakdown.
    async fn delete(&self, id: SentenceId) -> Result<()>;

    /// Aggregate statistics over the whole dataset.
    async fn stats(&self) -> Result<DatasetStatsDBResponse>;
}
