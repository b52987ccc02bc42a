//! Store models for accounts and usage records.

use crate::types::AccountId;
use chrono::{DateTime, Utc};

/// Store request for creating a new account.
///
/// The API key and request limit are derived by the store, never by the caller.
#[derive(Debug, Clone)]
pub struct AccountCreateDBRequest {
    pub email: String,
    pub plan: String,
}

/// Store response for an account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDBResponse {
    pub id: AccountId,
    pub email: String,
    pub api_key: String,
    pub plan: String,
    pub requests_used: i64,
    pub requests_limit: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One accepted, metered call.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecordDBResponse {
    pub id: i64,
    pub account_id: AccountId,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}

/// Quota state captured at the moment a charge was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeReceipt {
    pub account_id: AccountId,
    pub plan: String,
    /// Value of `requests_used` before this charge
    pub requests_used: i64,
    pub requests_limit: i64,
}

/// Result of an atomic check-and-charge.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    /// Usage was logged and `requests_used` incremented
    Charged(ChargeReceipt),
    /// `requests_used >= requests_limit`; nothing was written
    QuotaExceeded { requests_limit: i64 },
    /// The account does not exist or is deactivated; nothing was written
    Inactive,
}

/// Requests limit assigned to plans missing from [`PLAN_LIMITS`].
pub const DEFAULT_REQUESTS_LIMIT: i64 = 100;

/// Plan name to lifetime request ceiling, applied once at signup.
pub const PLAN_LIMITS: [(&str, i64); 4] = [("free", 100), ("basic", 1_000), ("premium", 10_000), ("enterprise", 100_000)];

/// Look up the request ceiling for `plan`, falling back to [`DEFAULT_REQUESTS_LIMIT`].
pub fn requests_limit_for_plan(plan: &str) -> i64 {
    PLAN_LIMITS
        .iter()
        .find(|(name, _)| *name == plan)
        .map(|(_, limit)| *limit)
        .unwrap_or(DEFAULT_REQUESTS_LIMIT)
}
