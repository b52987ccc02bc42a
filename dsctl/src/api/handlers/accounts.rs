//! HTTP handlers for account signup and account details.

use crate::{
    AppState,
    api::models::accounts::{AccountResponse, SignupRequest, SignupResponse},
    auth::bearer::BearerKey,
    errors::{Error, Result},
};
use axum::{extract::State, response::Json};

/// Create an account and issue an API key
#[utoipa::path(
    post,
    path = "/signup",
    tag = "accounts",
    summary = "Sign up",
    description = "Register an email address and receive an API key. The plan fixes the lifetime request limit: \
                   free 100, basic 1000, premium 10000, enterprise 100000 (unknown plans get 100).",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = SignupResponse),
        (status = 400, description = "Email missing or already registered", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, Json(request): Json<SignupRequest>) -> Result<Json<SignupResponse>> {
    if request.email.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "email must not be empty".to_string(),
        });
    }

    let account = state.access.signup(&request.email, &request.plan).await?;
    Ok(Json(account.into()))
}

/// Get the caller's account
#[utoipa::path(
    get,
    path = "/account",
    tag = "accounts",
    summary = "Get account",
    description = "Plan, quota and the 20 most recent metered calls for the presented key. Does not consume quota.",
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Missing, unknown or inactive API key", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_account(State(state): State<AppState>, BearerKey(api_key): BearerKey) -> Result<Json<AccountResponse>> {
    let summary = state.access.account_summary(&api_key).await?;
    Ok(Json(summary.into()))
}
