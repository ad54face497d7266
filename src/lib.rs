// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agile Wallet - Simulated Custodial Wallet Service
//!
//! This crate provides a custodial multi-currency wallet with KYC-tiered
//! spending limits, an admin approval queue for every outgoing transfer,
//! and snapshot persistence. Funds and transfers are simulated; no chain
//! is involved.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `engine` - Transaction admission and settlement state machine
//! - `ledger` - Accounts, addresses, and balances
//! - `limits` - KYC-tiered spending limit policy
//! - `rates` - USD exchange rates
//! - `support` - Support ticket threads
//! - `storage` - Snapshot persistence (redb)

pub mod api;
pub mod config;
pub mod currencies;
pub mod engine;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod limits;
pub mod models;
pub mod rates;
pub mod state;
pub mod storage;
pub mod support;
