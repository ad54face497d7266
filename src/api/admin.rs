// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin console endpoints: the approval queue, rate management, and
//! account/balance overrides. Authentication sits in front of this router
//! at the deployment edge and is out of scope here.

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
    models::{Account, TicketStatus, Transaction},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingTransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectTransactionRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRateRequest {
    /// New USD price per unit; must be finite and positive.
    pub rate: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetBalanceRequest {
    /// New balance in currency-native units; clamped at zero.
    pub balance: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountListResponse {
    pub accounts: Vec<Account>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatsResponse {
    pub total_accounts: usize,
    pub total_transactions: usize,
    pub pending_transactions: usize,
    pub open_tickets: usize,
}

/// Transactions waiting for approval, in queue (submission) order.
#[utoipa::path(
    get,
    path = "/v1/admin/transactions/pending",
    tag = "Admin",
    responses(
        (status = 200, description = "Approval queue contents", body = PendingTransactionsResponse)
    )
)]
pub async fn list_pending_transactions(
    State(state): State<AppState>,
) -> Json<PendingTransactionsResponse> {
    let guard = state.service.read().await;
    let transactions: Vec<Transaction> =
        guard.engine.pending().into_iter().cloned().collect();
    Json(PendingTransactionsResponse {
        total: transactions.len(),
        transactions,
    })
}

/// Approve a pending transaction.
///
/// An in-system destination is credited and receives a mirrored incoming
/// record; an external destination receives nothing.
#[utoipa::path(
    post,
    path = "/v1/admin/transactions/{tx_id}/approve",
    tag = "Admin",
    params(("tx_id" = String, Path, description = "Transaction identifier")),
    responses(
        (status = 200, description = "Settled transaction", body = Transaction),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Transaction already settled")
    )
)]
pub async fn approve_transaction(
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let settled = {
        let mut guard = state.service.write().await;
        let svc = &mut *guard;
        svc.engine.approve(&mut svc.ledger, &tx_id, Utc::now())?
    };
    state.persist().await;

    Ok(Json(settled))
}

/// Reject a pending transaction, refunding the sender and rolling back
/// the limit counters by the USD value captured at submission.
#[utoipa::path(
    post,
    path = "/v1/admin/transactions/{tx_id}/reject",
    tag = "Admin",
    params(("tx_id" = String, Path, description = "Transaction identifier")),
    request_body = RejectTransactionRequest,
    responses(
        (status = 200, description = "Rejected transaction", body = Transaction),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Transaction already settled")
    )
)]
pub async fn reject_transaction(
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
    Json(request): Json<RejectTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let settled = {
        let mut guard = state.service.write().await;
        let svc = &mut *guard;
        svc.engine.reject(&mut svc.ledger, &tx_id, &request.reason)?
    };
    state.persist().await;

    Ok(Json(settled))
}

/// Override the USD rate for one currency.
#[utoipa::path(
    put,
    path = "/v1/admin/rates/{currency_id}",
    tag = "Admin",
    params(("currency_id" = String, Path, description = "Currency identifier")),
    request_body = SetRateRequest,
    responses(
        (status = 204, description = "Rate updated"),
        (status = 400, description = "Unsupported currency or invalid rate")
    )
)]
pub async fn set_rate(
    State(state): State<AppState>,
    Path(currency_id): Path<String>,
    Json(request): Json<SetRateRequest>,
) -> Result<StatusCode, ApiError> {
    {
        let mut guard = state.service.write().await;
        guard.rates.set(&currency_id, request.rate)?;
    }
    state.persist().await;

    tracing::info!(currency_id, rate = request.rate, "exchange rate updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Restore all rates to their built-in defaults.
#[utoipa::path(
    post,
    path = "/v1/admin/rates/reset",
    tag = "Admin",
    responses((status = 204, description = "Rates reset to defaults"))
)]
pub async fn reset_rates(State(state): State<AppState>) -> StatusCode {
    {
        let mut guard = state.service.write().await;
        guard.rates.reset_to_defaults();
    }
    state.persist().await;

    tracing::info!("exchange rates reset to defaults");
    StatusCode::NO_CONTENT
}

/// Override one wallet balance, clamped at zero.
#[utoipa::path(
    put,
    path = "/v1/admin/accounts/{account_id}/balances/{currency_id}",
    tag = "Admin",
    params(
        ("account_id" = String, Path, description = "Account identifier"),
        ("currency_id" = String, Path, description = "Currency identifier")
    ),
    request_body = SetBalanceRequest,
    responses(
        (status = 204, description = "Balance updated"),
        (status = 404, description = "Account or wallet entry not found")
    )
)]
pub async fn set_balance(
    State(state): State<AppState>,
    Path((account_id, currency_id)): Path<(String, String)>,
    Json(request): Json<SetBalanceRequest>,
) -> Result<StatusCode, ApiError> {
    {
        let mut guard = state.service.write().await;
        guard
            .ledger
            .set_balance(&account_id, &currency_id, request.balance)?;
    }
    state.persist().await;

    tracing::info!(account_id, currency_id, balance = request.balance, "balance overridden");
    Ok(StatusCode::NO_CONTENT)
}

/// All registered accounts.
#[utoipa::path(
    get,
    path = "/v1/admin/accounts",
    tag = "Admin",
    responses((status = 200, description = "All accounts", body = AccountListResponse))
)]
pub async fn list_accounts(State(state): State<AppState>) -> Json<AccountListResponse> {
    let guard = state.service.read().await;
    let mut accounts: Vec<Account> = guard.ledger.accounts().into_iter().cloned().collect();
    accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(AccountListResponse {
        total: accounts.len(),
        accounts,
    })
}

/// Headline counters for the admin dashboard.
#[utoipa::path(
    get,
    path = "/v1/admin/stats",
    tag = "Admin",
    responses((status = 200, description = "System counters", body = SystemStatsResponse))
)]
pub async fn system_stats(State(state): State<AppState>) -> Json<SystemStatsResponse> {
    let guard = state.service.read().await;
    Json(SystemStatsResponse {
        total_accounts: guard.ledger.accounts().len(),
        total_transactions: guard.engine.len(),
        pending_transactions: guard.engine.queue().len(),
        open_tickets: guard
            .support
            .all()
            .iter()
            .filter(|t| t.status != TicketStatus::Closed)
            .count(),
    })
}
