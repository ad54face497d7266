// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded snapshot store backed by redb.
//!
//! A single table maps logical store name → JSON snapshot bytes. Writes
//! replace the whole snapshot for a store; reads of a never-written store
//! return `None` rather than an error so first boot needs no seeding step.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

/// Logical store names for the full state tree.
pub const LEDGER_STORE: &str = "ledger";
pub const TRANSACTIONS_STORE: &str = "transactions";
pub const RATES_STORE: &str = "rates";
pub const SUPPORT_STORE: &str = "support";

/// The one table: store name → serialized snapshot (JSON bytes).
const STORES: TableDefinition<&str, &[u8]> = TableDefinition::new("stores");

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Snapshot persistence for the wallet state tree.
pub struct SnapshotStore {
    db: Database,
}

impl SnapshotStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STORES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Replace the snapshot for one logical store.
    pub fn save<T: Serialize>(&self, store: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STORES)?;
            table.insert(store, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the snapshot for one logical store; `None` if never written.
    pub fn load<T: DeserializeOwned>(&self, store: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORES)?;
        match table.get(store)? {
            Some(value) => {
                let snapshot: T = serde_json::from_slice(value.value())?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountLedger;
    use crate::rates::ExchangeRates;

    fn temp_store() -> (SnapshotStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(&dir.path().join("wallet.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn missing_store_loads_as_none() {
        let (store, _dir) = temp_store();
        let loaded: Option<ExchangeRates> = store.load(RATES_STORE).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let (store, _dir) = temp_store();

        let mut rates = ExchangeRates::default();
        rates.set("btc", 12_345.0).unwrap();
        store.save(RATES_STORE, &rates).unwrap();

        let loaded: ExchangeRates = store.load(RATES_STORE).unwrap().unwrap();
        assert_eq!(loaded.get("btc"), 12_345.0);
        assert_eq!(loaded.get("eth"), rates.get("eth"));
    }

    #[test]
    fn save_replaces_the_previous_snapshot() {
        let (store, _dir) = temp_store();

        let mut rates = ExchangeRates::default();
        store.save(RATES_STORE, &rates).unwrap();
        rates.set("sol", 500.0).unwrap();
        store.save(RATES_STORE, &rates).unwrap();

        let loaded: ExchangeRates = store.load(RATES_STORE).unwrap().unwrap();
        assert_eq!(loaded.get("sol"), 500.0);
    }

    #[test]
    fn stores_are_independent() {
        let (store, _dir) = temp_store();

        let mut ledger = AccountLedger::new();
        let account = ledger.create_account(
            "a@example.com".into(),
            "Ada".into(),
            "Lovelace".into(),
            chrono::Utc::now(),
        );
        ledger.initialize_wallet(&account.id).unwrap();
        store.save(LEDGER_STORE, &ledger).unwrap();

        let loaded_ledger: AccountLedger = store.load(LEDGER_STORE).unwrap().unwrap();
        assert!(loaded_ledger.account(&account.id).is_some());
        assert_eq!(
            loaded_ledger.address(&account.id, "btc"),
            ledger.address(&account.id, "btc")
        );

        let rates: Option<ExchangeRates> = store.load(RATES_STORE).unwrap();
        assert!(rates.is_none());
    }

    #[test]
    fn reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.redb");

        {
            let store = SnapshotStore::open(&path).unwrap();
            store.save(RATES_STORE, &ExchangeRates::default()).unwrap();
        }

        let store = SnapshotStore::open(&path).unwrap();
        let loaded: ExchangeRates = store.load(RATES_STORE).unwrap().unwrap();
        assert_eq!(loaded.get("usdt"), 1.0);
    }
}
