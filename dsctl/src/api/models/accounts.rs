//! API request/response models for accounts.

use crate::auth::access::AccountSummary;
use crate::db::models::accounts::{AccountDBResponse, UsageRecordDBResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_plan() -> String {
    "free".to_string()
}

// Request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Contact email, unique across accounts (case-sensitive)
    #[schema(example = "researcher@example.org")]
    pub email: String,
    /// One of `free`, `basic`, `premium`, `enterprise`; other names get the free limit
    #[serde(default = "default_plan")]
    #[schema(example = "free")]
    pub plan: String,
}

// Response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
    /// Secret API key. Shown once; store it securely.
    pub api_key: String,
    pub plan: String,
    /// Lifetime request allowance for this key
    pub requests_limit: i64,
}

impl From<AccountDBResponse> for SignupResponse {
    fn from(account: AccountDBResponse) -> Self {
        Self {
            message: "User created successfully".to_string(),
            api_key: account.api_key,
            plan: account.plan,
            requests_limit: account.requests_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageRecordResponse {
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}

impl From<UsageRecordDBResponse> for UsageRecordResponse {
    fn from(record: UsageRecordDBResponse) -> Self {
        Self {
            endpoint: record.endpoint,
            timestamp: record.timestamp,
        }
    }
}

/// Account details as seen by the key holder.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub email: String,
    pub plan: String,
    pub requests_used: i64,
    pub requests_limit: i64,
    pub requests_remaining: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Most recent metered calls, newest first
    pub recent_usage: Vec<UsageRecordResponse>,
}

impl From<AccountSummary> for AccountResponse {
    fn from(summary: AccountSummary) -> Self {
        let account = summary.account;
        Self {
            requests_remaining: (account.requests_limit - account.requests_used).max(0),
            email: account.email,
            plan: account.plan,
            requests_used: account.requests_used,
            requests_limit: account.requests_limit,
            is_active: account.is_active,
            created_at: account.created_at,
            recent_usage: summary.recent_usage.into_iter().map(Into::into).collect(),
        }
    }
}
