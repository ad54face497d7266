// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Opaque id and address generation.
//!
//! Addresses imitate the conventions of each chain without any underlying
//! keys: BTC-style P2PKH (leading `1` + 33 base58 chars), ETH/USDT style
//! (`0x` + 40 hex), SOL style (44 base58 chars). Collisions are possible in
//! principle but irrelevant for a simulation of this size.

use rand::Rng;

use crate::currencies;
use crate::error::WalletError;

/// Base58 alphabet (no 0, O, I, l).
const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const HEX_LOWER: &str = "0123456789abcdef";
const HEX_UPPER: &str = "0123456789ABCDEF";

fn random_string(length: usize, charset: &str) -> String {
    let chars: Vec<char> = charset.chars().collect();
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// Generate a fresh address for a supported currency.
pub fn generate_wallet_address(currency_id: &str) -> Result<String, WalletError> {
    let currency = currencies::currency(currency_id)
        .ok_or_else(|| WalletError::CurrencyUnsupported(currency_id.to_string()))?;

    let address = match currency_id {
        "btc" => format!("{}{}", currency.address_prefix, random_string(33, BASE58)),
        "eth" | "usdt" => format!("{}{}", currency.address_prefix, random_string(40, HEX_LOWER)),
        "sol" => random_string(44, BASE58),
        _ => random_string(34, BASE58),
    };
    Ok(address)
}

pub fn generate_account_id() -> String {
    format!("user_{}", random_string(16, HEX_LOWER))
}

pub fn generate_transaction_id() -> String {
    format!("tx_{}", random_string(32, HEX_LOWER))
}

pub fn generate_ticket_id() -> String {
    format!("ticket_{}", random_string(12, HEX_UPPER))
}
