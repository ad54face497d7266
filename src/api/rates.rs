// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RatesResponse {
    /// currency id → USD price per unit.
    pub rates: HashMap<String, f64>,
}

/// Current USD exchange rates for every supported currency.
#[utoipa::path(
    get,
    path = "/v1/rates",
    tag = "Rates",
    responses(
        (status = 200, description = "USD rate per supported currency", body = RatesResponse)
    )
)]
pub async fn list_rates(State(state): State<AppState>) -> Json<RatesResponse> {
    let guard = state.service.read().await;
    Json(RatesResponse {
        rates: guard.rates.all().clone(),
    })
}
