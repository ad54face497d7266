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
    models::{Transaction, TxStatus},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendTransactionRequest {
    pub to_address: String,
    pub currency_id: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendTransactionResponse {
    pub transaction_id: String,
    pub status: TxStatus,
    /// USD value locked in at submission; refunds use this figure even if
    /// the rate moves afterwards.
    pub usd_value: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

/// Submit a transfer for admin approval.
///
/// Admission validates the destination address, amount, currency, balance,
/// and spending limits, in that order. On success the sender is debited
/// immediately and the transaction waits in the approval queue.
#[utoipa::path(
    post,
    path = "/v1/accounts/{account_id}/send",
    tag = "Transactions",
    params(("account_id" = String, Path, description = "Sending account")),
    request_body = SendTransactionRequest,
    responses(
        (status = 201, description = "Transaction admitted and pending", body = SendTransactionResponse),
        (status = 400, description = "Invalid address, amount, or currency"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Insufficient balance or limit exceeded")
    )
)]
pub async fn send_transaction(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(request): Json<SendTransactionRequest>,
) -> Result<(StatusCode, Json<SendTransactionResponse>), ApiError> {
    let response = {
        let mut guard = state.service.write().await;
        let svc = &mut *guard;
        let tx_id = svc.engine.submit(
            &mut svc.ledger,
            &svc.rates,
            &account_id,
            &request.to_address,
            &request.currency_id,
            request.amount,
            Utc::now(),
        )?;
        let tx = svc
            .engine
            .get(&tx_id)
            .ok_or_else(|| ApiError::internal("Admitted transaction vanished"))?;
        SendTransactionResponse {
            transaction_id: tx.id.clone(),
            status: tx.status,
            usd_value: tx.usd_value,
        }
    };
    state.persist().await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Transaction history for an account, newest first. Includes both sides
/// of internal transfers: outgoing records and mirrored incoming ones.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/transactions",
    tag = "Transactions",
    params(("account_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Transaction history", body = TransactionListResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let guard = state.service.read().await;
    if guard.ledger.account(&account_id).is_none() {
        return Err(ApiError::not_found("Account not found"));
    }
    let transactions: Vec<Transaction> = guard
        .engine
        .transactions_for(&account_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(TransactionListResponse {
        total: transactions.len(),
        transactions,
    }))
}
