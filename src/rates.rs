// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-settable USD exchange rates.
//!
//! Current-value only, no history. A missing or zeroed rate means
//! "valuation unavailable" and callers must refuse to price against it,
//! not treat the asset as worthless.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::currencies;
use crate::error::WalletError;

/// Default rates seeded on first boot and restored by `reset_to_defaults`.
const DEFAULT_RATES: [(&str, f64); 4] = [
    ("btc", 43_250.0),
    ("eth", 2_680.0),
    ("usdt", 1.0),
    ("sol", 98.0),
];

/// Mutable currency → USD-per-unit table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRates {
    rates: HashMap<String, f64>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES
                .iter()
                .map(|(id, rate)| (id.to_string(), *rate))
                .collect(),
        }
    }
}

impl ExchangeRates {
    /// USD per unit for a currency; 0.0 when unknown (valuation
    /// unavailable, not "worthless").
    pub fn get(&self, currency_id: &str) -> f64 {
        self.rates.get(currency_id).copied().unwrap_or(0.0)
    }

    /// Admin override of one rate. The rate must be finite and positive and
    /// the currency must be in the supported set.
    pub fn set(&mut self, currency_id: &str, rate: f64) -> Result<(), WalletError> {
        if !currencies::is_supported(currency_id) {
            return Err(WalletError::CurrencyUnsupported(currency_id.to_string()));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }
        self.rates.insert(currency_id.to_string(), rate);
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Snapshot of the whole table for the rates endpoint.
    pub fn all(&self) -> &HashMap<String, f64> {
        &self.rates
    }
}
