use crate::crypto::generate_api_key;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::AccountStore,
    models::accounts::{
        AccountCreateDBRequest, AccountDBResponse, ChargeOutcome, ChargeReceipt, UsageRecordDBResponse, requests_limit_for_plan,
    },
};
use crate::types::{AccountId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

// Database entity model for an account
#[derive(Debug, Clone, FromRow)]
struct Account {
    pub id: AccountId,
    pub email: String,
    pub api_key: String,
    pub plan: String,
    pub requests_used: i64,
    pub requests_limit: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountDBResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            api_key: account.api_key,
            plan: account.plan,
            requests_used: account.requests_used,
            requests_limit: account.requests_limit,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct UsageRecord {
    pub id: i64,
    pub account_id: AccountId,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}

impl From<UsageRecord> for UsageRecordDBResponse {
    fn from(record: UsageRecord) -> Self {
        Self {
            id: record.id,
            account_id: record.account_id,
            endpoint: record.endpoint,
            timestamp: record.timestamp,
        }
    }
}

// Quota columns read under the row lock during a charge
#[derive(Debug, FromRow)]
struct QuotaRow {
    pub plan: String,
    pub requests_used: i64,
    pub requests_limit: i64,
    pub is_active: bool,
}

const ACCOUNT_COLUMNS: &str = "id, email, api_key, plan, requests_used, requests_limit, is_active, created_at";

/// Postgres-backed [`AccountStore`].
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip(self, request), fields(plan = %request.plan), err)]
    async fn create(&self, request: &AccountCreateDBRequest) -> Result<AccountDBResponse> {
        let api_key = generate_api_key();
        let requests_limit = requests_limit_for_plan(&request.plan);

        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (id, email, api_key, plan, requests_used, requests_limit, is_active)
             VALUES ($1, $2, $3, $4, 0, $5, TRUE)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4())
        .bind(&request.email)
        .bind(&api_key)
        .bind(&request.plan)
        .bind(requests_limit)
        .fetch_one(&self.pool)
        .await?;

        Ok(account.into())
    }

    #[instrument(skip_all, err)]
    async fn find_by_key(&self, api_key: &str) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE api_key = $1"))
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account.map(Into::into))
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: AccountId) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account.map(Into::into))
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn charge(&self, id: AccountId, endpoint: &str) -> Result<ChargeOutcome> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent charges against the same account
        let quota = sqlx::query_as::<_, QuotaRow>(
            "SELECT plan, requests_used, requests_limit, is_active FROM accounts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let quota = match quota {
            Some(quota) if quota.is_active => quota,
            _ => {
                tx.rollback().await?;
                return Ok(ChargeOutcome::Inactive);
            }
        };

        if quota.requests_used >= quota.requests_limit {
            tx.rollback().await?;
            return Ok(ChargeOutcome::QuotaExceeded {
                requests_limit: quota.requests_limit,
            });
        }

        sqlx::query("INSERT INTO api_usage (account_id, endpoint) VALUES ($1, $2)")
            .bind(id)
            .bind(endpoint)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE accounts SET requests_used = requests_used + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ChargeOutcome::Charged(ChargeReceipt {
            account_id: id,
            plan: quota.plan,
            requests_used: quota.requests_used,
            requests_limit: quota.requests_limit,
        }))
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn deactivate(&self, id: AccountId) -> Result<()> {
        let result = sqlx::query("UPDATE accounts SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    async fn list_usage(&self, id: AccountId, limit: i64) -> Result<Vec<UsageRecordDBResponse>> {
        let records = sqlx::query_as::<_, UsageRecord>(
            "SELECT id, account_id, endpoint, timestamp FROM api_usage
             WHERE account_id = $1
             ORDER BY timestamp DESC, id DESC
             LIMIT $2",
        )
        .bind(id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
