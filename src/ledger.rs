// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account ledger: accounts, their per-currency addresses, and balances.
//!
//! Balances are owned here exclusively; the transaction engine and the
//! admin console go through [`AccountLedger::debit`] / [`credit`] and never
//! write a balance directly. Every debit/credit pair runs to completion
//! under the service write lock, which makes it atomic per
//! `(account, currency)` as the concurrency model requires.
//!
//! [`credit`]: AccountLedger::credit

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::currencies::SUPPORTED_CURRENCIES;
use crate::error::WalletError;
use crate::identity;
use crate::limits;
use crate::models::{Account, KycTier, WalletEntry};

/// Partial KYC update; only present fields are applied. A tier change
/// recomputes the account's limits.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct KycUpdate {
    pub level: Option<KycTier>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
}

/// Owns all accounts and their wallet entries.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    accounts: HashMap<String, Account>,
    /// account id → one entry per supported currency (after initialization).
    wallets: HashMap<String, Vec<WalletEntry>>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create an account at tier `none`. The wallet is initialized
    /// separately (see [`initialize_wallet`]).
    ///
    /// [`initialize_wallet`]: AccountLedger::initialize_wallet
    pub fn create_account(
        &mut self,
        email: String,
        first_name: String,
        last_name: String,
        now: DateTime<Utc>,
    ) -> Account {
        let account = Account::new(identity::generate_account_id(), email, first_name, last_name, now);
        self.accounts.insert(account.id.clone(), account.clone());
        account
    }

    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts.get(account_id)
    }

    pub fn account_mut(&mut self, account_id: &str) -> Option<&mut Account> {
        self.accounts.get_mut(account_id)
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.email == email)
    }

    /// All accounts, for the admin console.
    pub fn accounts(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    /// Apply a partial KYC update, recomputing limits when the tier moved.
    pub fn update_kyc(
        &mut self,
        account_id: &str,
        update: KycUpdate,
        now: DateTime<Utc>,
    ) -> Result<&Account, WalletError> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| WalletError::NotFound("Account".into()))?;

        if let Some(first_name) = update.first_name {
            account.kyc.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            account.kyc.last_name = last_name;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            account.kyc.date_of_birth = Some(date_of_birth);
        }
        if let Some(phone_number) = update.phone_number {
            account.kyc.phone_number = Some(phone_number);
        }
        if let Some(document_type) = update.document_type {
            account.kyc.document_type = Some(document_type);
        }
        if let Some(document_number) = update.document_number {
            account.kyc.document_number = Some(document_number);
        }
        if let Some(level) = update.level {
            account.kyc.level = level;
            account.kyc.submitted_at.get_or_insert(now);
            if level > KycTier::None {
                account.kyc.verified_at = Some(now);
            }
            limits::apply_tier(account);
        }
        Ok(&*account)
    }

    // =========================================================================
    // Wallet initialization and lookups
    // =========================================================================

    /// Create one zero-balance address per supported currency.
    ///
    /// First-call-wins: a second call for the same account is a no-op, the
    /// original addresses are kept.
    pub fn initialize_wallet(&mut self, account_id: &str) -> Result<(), WalletError> {
        if !self.accounts.contains_key(account_id) {
            return Err(WalletError::NotFound("Account".into()));
        }
        if self.wallets.contains_key(account_id) {
            return Ok(());
        }

        let mut entries = Vec::with_capacity(SUPPORTED_CURRENCIES.len());
        for currency in &SUPPORTED_CURRENCIES {
            entries.push(WalletEntry {
                currency_id: currency.id.to_string(),
                address: identity::generate_wallet_address(currency.id)?.into(),
                balance: 0.0,
            });
        }
        self.wallets.insert(account_id.to_string(), entries);
        Ok(())
    }

    /// Current balance; 0.0 for an uninitialized currency.
    pub fn balance(&self, account_id: &str, currency_id: &str) -> f64 {
        self.entry(account_id, currency_id)
            .map(|e| e.balance)
            .unwrap_or(0.0)
    }

    /// Receiving address; empty string for an uninitialized currency.
    pub fn address(&self, account_id: &str, currency_id: &str) -> String {
        self.entry(account_id, currency_id)
            .map(|e| e.address.to_string())
            .unwrap_or_default()
    }

    /// All wallet entries for an account (empty slice if uninitialized).
    pub fn entries(&self, account_id: &str) -> &[WalletEntry] {
        self.wallets
            .get(account_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reverse lookup: which account owns `address` for `currency_id`?
    /// `None` means the address is external to this system.
    pub fn account_for_address(&self, address: &str, currency_id: &str) -> Option<String> {
        self.wallets.iter().find_map(|(account_id, entries)| {
            entries
                .iter()
                .any(|e| e.currency_id == currency_id && e.address.0 == address)
                .then(|| account_id.clone())
        })
    }

    fn entry(&self, account_id: &str, currency_id: &str) -> Option<&WalletEntry> {
        self.wallets
            .get(account_id)?
            .iter()
            .find(|e| e.currency_id == currency_id)
    }

    fn entry_mut(&mut self, account_id: &str, currency_id: &str) -> Option<&mut WalletEntry> {
        self.wallets
            .get_mut(account_id)?
            .iter_mut()
            .find(|e| e.currency_id == currency_id)
    }

    // =========================================================================
    // Debits and credits
    // =========================================================================

    /// Remove funds. Fails with `InsufficientBalance` if the result would
    /// go below zero; the stored balance is additionally clamped so it can
    /// never end up negative.
    pub fn debit(
        &mut self,
        account_id: &str,
        currency_id: &str,
        amount: f64,
    ) -> Result<(), WalletError> {
        let entry = self
            .entry_mut(account_id, currency_id)
            .ok_or_else(|| WalletError::NotFound("Wallet".into()))?;
        if amount > entry.balance {
            return Err(WalletError::InsufficientBalance);
        }
        entry.balance = (entry.balance - amount).max(0.0);
        Ok(())
    }

    /// Add funds. Unbounded above; only fails when the wallet entry does
    /// not exist.
    pub fn credit(
        &mut self,
        account_id: &str,
        currency_id: &str,
        amount: f64,
    ) -> Result<(), WalletError> {
        let entry = self
            .entry_mut(account_id, currency_id)
            .ok_or_else(|| WalletError::NotFound("Wallet".into()))?;
        entry.balance += amount;
        Ok(())
    }

    /// Admin override of one balance, clamped at zero.
    pub fn set_balance(
        &mut self,
        account_id: &str,
        currency_id: &str,
        new_balance: f64,
    ) -> Result<(), WalletError> {
        let entry = self
            .entry_mut(account_id, currency_id)
            .ok_or_else(|| WalletError::NotFound("Wallet".into()))?;
        entry.balance = new_balance.max(0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_account() -> (AccountLedger, String) {
        let mut ledger = AccountLedger::new();
        let account = ledger.create_account(
            "a@example.com".into(),
            "Ada".into(),
            "Lovelace".into(),
            Utc::now(),
        );
        ledger.initialize_wallet(&account.id).unwrap();
        (ledger, account.id)
    }

    #[test]
    fn initialize_creates_one_address_per_currency() {
        let (ledger, id) = ledger_with_account();
        let entries = ledger.entries(&id);
        assert_eq!(entries.len(), SUPPORTED_CURRENCIES.len());
        for entry in entries {
            assert_eq!(entry.balance, 0.0);
            assert!(!entry.address.0.is_empty());
        }
    }

    #[test]
    fn initialize_is_first_call_wins() {
        let (mut ledger, id) = ledger_with_account();
        let before = ledger.address(&id, "btc");
        ledger.initialize_wallet(&id).unwrap();
        assert_eq!(ledger.address(&id, "btc"), before);
    }

    #[test]
    fn initialize_unknown_account_fails() {
        let mut ledger = AccountLedger::new();
        assert!(matches!(
            ledger.initialize_wallet("user_missing"),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn lookups_default_for_uninitialized_state() {
        let ledger = AccountLedger::new();
        assert_eq!(ledger.balance("nobody", "btc"), 0.0);
        assert_eq!(ledger.address("nobody", "btc"), "");
        assert!(ledger.entries("nobody").is_empty());
    }

    #[test]
    fn debit_rejects_overdraft_and_leaves_balance_untouched() {
        let (mut ledger, id) = ledger_with_account();
        ledger.credit(&id, "btc", 1.0).unwrap();

        assert_eq!(
            ledger.debit(&id, "btc", 1.5),
            Err(WalletError::InsufficientBalance)
        );
        assert_eq!(ledger.balance(&id, "btc"), 1.0);
    }

    #[test]
    fn debit_and_credit_round_trip() {
        let (mut ledger, id) = ledger_with_account();
        ledger.credit(&id, "eth", 2.5).unwrap();
        ledger.debit(&id, "eth", 1.0).unwrap();
        assert_eq!(ledger.balance(&id, "eth"), 1.5);
        ledger.credit(&id, "eth", 1.0).unwrap();
        assert_eq!(ledger.balance(&id, "eth"), 2.5);
    }

    #[test]
    fn balance_never_goes_negative() {
        let (mut ledger, id) = ledger_with_account();
        ledger.credit(&id, "sol", 5.0).unwrap();
        ledger.debit(&id, "sol", 5.0).unwrap();
        assert_eq!(ledger.balance(&id, "sol"), 0.0);
        assert!(ledger.debit(&id, "sol", 0.01).is_err());
    }

    #[test]
    fn account_for_address_resolves_only_matching_currency() {
        let (mut ledger, id) = ledger_with_account();
        let btc_addr = ledger.address(&id, "btc");

        assert_eq!(ledger.account_for_address(&btc_addr, "btc"), Some(id.clone()));
        assert_eq!(ledger.account_for_address(&btc_addr, "eth"), None);
        assert_eq!(ledger.account_for_address("1ExternalAddr", "btc"), None);

        // Second account must not shadow the first.
        let other = ledger.create_account(
            "b@example.com".into(),
            "Grace".into(),
            "Hopper".into(),
            Utc::now(),
        );
        ledger.initialize_wallet(&other.id).unwrap();
        assert_eq!(ledger.account_for_address(&btc_addr, "btc"), Some(id));
    }

    #[test]
    fn kyc_upgrade_recomputes_limits_and_keeps_counters() {
        let (mut ledger, id) = ledger_with_account();
        ledger.account_mut(&id).unwrap().daily_spent = 42.0;

        let updated = ledger
            .update_kyc(
                &id,
                KycUpdate {
                    level: Some(KycTier::Verified),
                    document_type: Some("passport".into()),
                    ..KycUpdate::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(updated.kyc.level, KycTier::Verified);
        assert_eq!(updated.daily_limit, 10_000.0);
        assert_eq!(updated.daily_spent, 42.0);
        assert!(updated.kyc.verified_at.is_some());
        assert_eq!(updated.kyc.document_type.as_deref(), Some("passport"));
    }

    #[test]
    fn set_balance_clamps_at_zero() {
        let (mut ledger, id) = ledger_with_account();
        ledger.set_balance(&id, "btc", -3.0).unwrap();
        assert_eq!(ledger.balance(&id, "btc"), 0.0);
        ledger.set_balance(&id, "btc", 7.0).unwrap();
        assert_eq!(ledger.balance(&id, "btc"), 7.0);
    }

    #[test]
    fn duplicate_email_lookup() {
        let (mut ledger, _id) = ledger_with_account();
        assert!(ledger.account_by_email("a@example.com").is_some());
        assert!(ledger.account_by_email("nobody@example.com").is_none());
        ledger.create_account("c@example.com".into(), "X".into(), "Y".into(), Utc::now());
        assert!(ledger.account_by_email("c@example.com").is_some());
    }
}
