// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state.
//!
//! [`WalletService`] bundles the four core services; the API layer reaches
//! into its fields directly, passing ledger and rates into the engine at
//! the call site (no ambient lookups). [`AppState`] wraps the service in a
//! single `RwLock` — every mutating handler holds the write lock across
//! the whole operation, which serializes the read-modify-write of
//! balances and spent counters per account.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::engine::TransactionEngine;
use crate::ledger::AccountLedger;
use crate::rates::ExchangeRates;
use crate::storage::{
    SnapshotStore, LEDGER_STORE, RATES_STORE, SUPPORT_STORE, TRANSACTIONS_STORE,
};
use crate::support::SupportDesk;

/// The complete wallet state tree.
#[derive(Default)]
pub struct WalletService {
    pub ledger: AccountLedger,
    pub rates: ExchangeRates,
    pub engine: TransactionEngine,
    pub support: SupportDesk,
}

impl WalletService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the state tree from snapshots; stores that were never
    /// written start fresh.
    pub fn load_from(storage: &SnapshotStore) -> Self {
        fn load_or_default<T: Default + serde::de::DeserializeOwned>(
            storage: &SnapshotStore,
            store: &str,
        ) -> T {
            match storage.load(store) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => T::default(),
                Err(error) => {
                    tracing::warn!(store, %error, "failed to load snapshot, starting fresh");
                    T::default()
                }
            }
        }

        Self {
            ledger: load_or_default(storage, LEDGER_STORE),
            rates: load_or_default(storage, RATES_STORE),
            engine: load_or_default(storage, TRANSACTIONS_STORE),
            support: load_or_default(storage, SUPPORT_STORE),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RwLock<WalletService>>,
    storage: Option<Arc<SnapshotStore>>,
}

impl AppState {
    /// In-memory state with snapshot persistence.
    pub fn new(service: WalletService, storage: SnapshotStore) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            storage: Some(Arc::new(storage)),
        }
    }

    /// State without persistence, for tests.
    pub fn ephemeral(service: WalletService) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            storage: None,
        }
    }

    /// Snapshot the full state tree.
    ///
    /// Fire-and-forget by design: persistence sits outside the commit path,
    /// so failures are logged and never surfaced to the caller.
    pub async fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let service = self.service.read().await;
        for (store, result) in [
            (LEDGER_STORE, storage.save(LEDGER_STORE, &service.ledger)),
            (RATES_STORE, storage.save(RATES_STORE, &service.rates)),
            (
                TRANSACTIONS_STORE,
                storage.save(TRANSACTIONS_STORE, &service.engine),
            ),
            (SUPPORT_STORE, storage.save(SUPPORT_STORE, &service.support)),
        ] {
            if let Err(error) = result {
                tracing::warn!(store, %error, "failed to persist snapshot");
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::ephemeral(WalletService::new())
    }
}
