//! Key verification and quota charging.

use crate::db::{
    errors::DbError,
    handlers::AccountStore,
    models::accounts::{AccountCreateDBRequest, AccountDBResponse, ChargeOutcome, ChargeReceipt, UsageRecordDBResponse},
};
use crate::types::{AccountId, abbrev_uuid};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Number of usage records returned with an account summary.
pub const RECENT_USAGE_LIMIT: i64 = 20;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No account holds this key, or the account is deactivated
    #[error("Invalid or inactive API key")]
    InvalidKey,

    /// `requests_used` has reached `requests_limit`; nothing was charged
    #[error("Request quota exhausted (limit {requests_limit})")]
    QuotaExceeded { requests_limit: i64 },

    #[error(transparent)]
    Database(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// An account together with its most recent metered calls.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: AccountDBResponse,
    pub recent_usage: Vec<UsageRecordDBResponse>,
}

/// The only component that reads or mutates account quota state.
#[derive(Clone)]
pub struct AccessController {
    accounts: Arc<dyn AccountStore>,
}

impl AccessController {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Issue a new account and API key.
    #[instrument(skip(self, email), fields(plan = %plan), err)]
    pub async fn signup(&self, email: &str, plan: &str) -> std::result::Result<AccountDBResponse, DbError> {
        let account = self
            .accounts
            .create(&AccountCreateDBRequest {
                email: email.to_string(),
                plan: plan.to_string(),
            })
            .await?;

        info!(
            account_id = %abbrev_uuid(&account.id),
            requests_limit = account.requests_limit,
            "Issued API key"
        );
        Ok(account)
    }

    /// Resolve a key to an active account, without looking at quota.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, api_key: &str) -> Result<AccountDBResponse> {
        match self.accounts.find_by_key(api_key).await? {
            Some(account) if account.is_active => Ok(account),
            _ => {
                counter!("dsctl_charge_rejections_total", "reason" => "invalid_key").increment(1);
                debug!("Rejected unknown or inactive API key");
                Err(AuthError::InvalidKey)
            }
        }
    }

    /// Check the key and its remaining quota without charging.
    pub async fn verify(&self, api_key: &str) -> Result<AccountDBResponse> {
        let account = self.authenticate(api_key).await?;
        if account.requests_used >= account.requests_limit {
            counter!("dsctl_charge_rejections_total", "reason" => "quota_exceeded").increment(1);
            return Err(AuthError::QuotaExceeded {
                requests_limit: account.requests_limit,
            });
        }
        Ok(account)
    }

    /// Verify the key, then atomically log one call to `endpoint` and consume one request.
    ///
    /// The returned receipt reflects quota state from before this charge. Charges are final once
    /// this returns `Ok`.
    #[instrument(skip(self, api_key), fields(endpoint = %endpoint))]
    pub async fn authenticate_and_charge(&self, api_key: &str, endpoint: &'static str) -> Result<ChargeReceipt> {
        let account = self.authenticate(api_key).await?;

        match self.accounts.charge(account.id, endpoint).await? {
            ChargeOutcome::Charged(receipt) => {
                counter!("dsctl_charges_total", "endpoint" => endpoint).increment(1);
                debug!(
                    account_id = %abbrev_uuid(&receipt.account_id),
                    requests_used = receipt.requests_used + 1,
                    requests_limit = receipt.requests_limit,
                    "Charged request"
                );
                Ok(receipt)
            }
            ChargeOutcome::QuotaExceeded { requests_limit } => {
                counter!("dsctl_charge_rejections_total", "reason" => "quota_exceeded").increment(1);
                debug!(account_id = %abbrev_uuid(&account.id), requests_limit, "Quota exhausted");
                Err(AuthError::QuotaExceeded { requests_limit })
            }
            // deactivated between lookup and charge
            ChargeOutcome::Inactive => {
                counter!("dsctl_charge_rejections_total", "reason" => "invalid_key").increment(1);
                Err(AuthError::InvalidKey)
            }
        }
    }

    /// Account details and recent usage for the key holder. Not metered.
    #[instrument(skip_all)]
    pub async fn account_summary(&self, api_key: &str) -> Result<AccountSummary> {
        let account = self.authenticate(api_key).await?;
        let recent_usage = self.accounts.list_usage(account.id, RECENT_USAGE_LIMIT).await?;
        Ok(AccountSummary { account, recent_usage })
    }

    /// Permanently disable an account; its key stops authenticating immediately.
    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&id)), err)]
    pub async fn deactivate(&self, id: AccountId) -> std::result::Result<(), DbError> {
        self.accounts.deactivate(id).await?;
        info!(account_id = %abbrev_uuid(&id), "Deactivated account");
        Ok(())
    }
}
