// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, models::WalletEntry, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct BalancesResponse {
    pub account_id: String,
    pub entries: Vec<WalletEntry>,
}

/// All wallet entries for an account: one (currency, address, balance)
/// triple per supported currency.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/balances",
    tag = "Wallet",
    params(("account_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Wallet entries", body = BalancesResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn list_balances(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let guard = state.service.read().await;
    if guard.ledger.account(&account_id).is_none() {
        return Err(ApiError::not_found("Account not found"));
    }
    Ok(Json(BalancesResponse {
        entries: guard.ledger.entries(&account_id).to_vec(),
        account_id,
    }))
}
