// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static table of the currencies this simulation supports.
//!
//! Every account gets one generated address per entry here when its wallet
//! is initialized. Rates for anything outside this table are treated as
//! "valuation unavailable".

use serde::Serialize;
use utoipa::ToSchema;

/// Descriptor for one supported currency.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Currency {
    /// Stable lowercase identifier used in API paths and storage.
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Prefix of generated addresses ("" for SOL-style).
    pub address_prefix: &'static str,
    /// Native decimal places, for client display only.
    pub decimals: u8,
}

pub const SUPPORTED_CURRENCIES: [Currency; 4] = [
    Currency {
        id: "btc",
        name: "Bitcoin",
        symbol: "BTC",
        address_prefix: "1",
        decimals: 8,
    },
    Currency {
        id: "eth",
        name: "Ethereum",
        symbol: "ETH",
        address_prefix: "0x",
        decimals: 18,
    },
    Currency {
        id: "usdt",
        name: "Tether",
        symbol: "USDT",
        address_prefix: "0x",
        decimals: 6,
    },
    Currency {
        id: "sol",
        name: "Solana",
        symbol: "SOL",
        address_prefix: "",
        decimals: 9,
    },
];

/// Look up a supported currency by id.
pub fn currency(currency_id: &str) -> Option<&'static Currency> {
    SUPPORTED_CURRENCIES.iter().find(|c| c.id == currency_id)
}

/// Whether the given id is in the supported set.
pub fn is_supported(currency_id: &str) -> bool {
    currency(currency_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_four_currencies_present() {
        for id in ["btc", "eth", "usdt", "sol"] {
            assert!(is_supported(id), "{id} should be supported");
        }
        assert!(!is_supported("doge"));
    }

    #[test]
    fn eth_style_currencies_share_the_0x_prefix() {
        assert_eq!(currency("eth").unwrap().address_prefix, "0x");
        assert_eq!(currency("usdt").unwrap().address_prefix, "0x");
        assert_eq!(currency("btc").unwrap().address_prefix, "1");
        assert_eq!(currency("sol").unwrap().address_prefix, "");
    }
}
