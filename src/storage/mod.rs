// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistence Module
//!
//! Snapshot persistence for the wallet state tree, backed by redb
//! (pure Rust, ACID). There is no schema beyond "JSON snapshot of one
//! logical store": each service serializes as a whole and is keyed by its
//! store name.
//!
//! ## Store Layout
//!
//! One redb table, `stores`:
//!
//! ```text
//! "ledger"       → AccountLedger (accounts + wallet entries)
//! "transactions" → TransactionEngine (history + admin queue)
//! "rates"        → ExchangeRates
//! "support"      → SupportDesk
//! ```
//!
//! Saves happen after the commit point of each operation and are
//! fire-and-forget: a failed save is logged, never propagated into the
//! operation result.

pub mod snapshot;

pub use snapshot::{
    SnapshotStore, StorageError, StorageResult, LEDGER_STORE, RATES_STORE, SUPPORT_STORE,
    TRANSACTIONS_STORE,
};
