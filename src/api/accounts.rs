// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::KycUpdate,
    models::{Account, KycTier, TierLimits},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LimitsResponse {
    pub account_id: String,
    pub tier: KycTier,
    pub daily_limit: f64,
    pub monthly_limit: f64,
    pub daily_spent: f64,
    pub monthly_spent: f64,
    /// Post-reset allowance still available in each window, clamped at zero.
    pub remaining: TierLimits,
}

/// Create an account and initialize its wallet.
///
/// The account starts at tier `none`; one zero-balance address per
/// supported currency is generated immediately.
#[utoipa::path(
    post,
    path = "/v1/accounts",
    tag = "Accounts",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid signup fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let email = request.email.trim().to_lowercase();
    let first_name = request.first_name.trim().to_string();
    let last_name = request.last_name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email address is required"));
    }
    if first_name.is_empty() || last_name.is_empty() {
        return Err(ApiError::bad_request("First and last name are required"));
    }

    let account = {
        let mut guard = state.service.write().await;
        let svc = &mut *guard;
        if svc.ledger.account_by_email(&email).is_some() {
            return Err(ApiError::conflict("An account with this email already exists"));
        }
        let account = svc.ledger.create_account(email, first_name, last_name, Utc::now());
        svc.ledger.initialize_wallet(&account.id)?;
        account
    };
    state.persist().await;

    tracing::info!(account_id = %account.id, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}",
    tag = "Accounts",
    params(("account_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let guard = state.service.read().await;
    let account = guard
        .ledger
        .account(&account_id)
        .ok_or_else(|| ApiError::not_found("Account not found"))?;
    Ok(Json(account.clone()))
}

/// Apply a partial KYC update.
///
/// Only the fields present in the body are touched; a tier change
/// recomputes the account's spending limits while the spent counters are
/// carried over unchanged.
#[utoipa::path(
    put,
    path = "/v1/accounts/{account_id}/kyc",
    tag = "Accounts",
    params(("account_id" = String, Path, description = "Account identifier")),
    request_body = KycUpdate,
    responses(
        (status = 200, description = "Updated account", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_kyc(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(update): Json<KycUpdate>,
) -> Result<Json<Account>, ApiError> {
    let account = {
        let mut guard = state.service.write().await;
        guard.ledger.update_kyc(&account_id, update, Utc::now())?.clone()
    };
    state.persist().await;

    tracing::info!(account_id = %account.id, tier = ?account.kyc.level, "kyc updated");
    Ok(Json(account))
}

/// Current spending limits and window counters.
///
/// Reading the limits runs the lazy window rollover, so the reported
/// counters are always current as of the request.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/limits",
    tag = "Accounts",
    params(("account_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Limits and counters", body = LimitsResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_limits(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<LimitsResponse>, ApiError> {
    let response = {
        let mut guard = state.service.write().await;
        let account = guard
            .ledger
            .account_mut(&account_id)
            .ok_or_else(|| ApiError::not_found("Account not found"))?;
        let remaining = crate::limits::remaining(account, Utc::now());
        LimitsResponse {
            account_id: account.id.clone(),
            tier: account.kyc.level,
            daily_limit: account.daily_limit,
            monthly_limit: account.monthly_limit,
            daily_spent: account.daily_spent,
            monthly_spent: account.monthly_spent,
            remaining,
        }
    };
    state.persist().await;

    Ok(Json(response))
}
