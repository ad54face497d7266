// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction admission and settlement state machine.
//!
//! The pipeline: validate → price in USD → check balance and tier limits →
//! debit the sender (pessimistic reservation) → enqueue for admin review →
//! settle on approve/reject. Every check happens before the commit point;
//! a failed submit leaves no partial state behind.
//!
//! Collaborators (ledger, rates) are passed in by the caller rather than
//! looked up ambiently, so the engine itself owns only the transaction
//! history and the pending queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currencies;
use crate::error::WalletError;
use crate::identity;
use crate::ledger::AccountLedger;
use crate::limits;
use crate::models::{Transaction, TxStatus};
use crate::rates::ExchangeRates;

// =============================================================================
// Admin Queue
// =============================================================================

/// Ordered ids of transactions awaiting an admin decision.
///
/// An id is pushed exactly once at submit and removed exactly once at
/// settlement; the queue never holds terminal transactions.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AdminQueue {
    pending: Vec<String>,
}

impl AdminQueue {
    pub fn push(&mut self, tx_id: String) {
        self.pending.push(tx_id);
    }

    /// Remove an id; returns whether it was queued.
    pub fn remove(&mut self, tx_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|id| id != tx_id);
        self.pending.len() != before
    }

    pub fn ids(&self) -> &[String] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// =============================================================================
// Transaction Engine
// =============================================================================

/// The settlement state machine plus the transaction history it guards.
///
/// History is append-only; after creation only a transaction's `status`
/// (and `error_message` on rejection) ever change.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionEngine {
    transactions: Vec<Transaction>,
    queue: AdminQueue,
}

impl TransactionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Admission
    // =========================================================================

    /// Admit a transfer request.
    ///
    /// On success the sender is debited immediately — the funds vanish from
    /// their visible balance even though nothing is settled yet — the spent
    /// counters accrue the USD value, and the new pending transaction id is
    /// returned after being published to the admin queue.
    pub fn submit(
        &mut self,
        ledger: &mut AccountLedger,
        rates: &ExchangeRates,
        from_account: &str,
        to_address: &str,
        currency_id: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<String, WalletError> {
        let to_address = to_address.trim();
        if to_address.is_empty() {
            return Err(WalletError::InvalidAddress);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }
        if !currencies::is_supported(currency_id) {
            return Err(WalletError::CurrencyUnsupported(currency_id.to_string()));
        }
        let rate = rates.get(currency_id);
        if rate <= 0.0 {
            // Rate 0 means "valuation unavailable", not "worthless" —
            // refuse rather than admit an unpriceable transfer.
            return Err(WalletError::CurrencyUnsupported(currency_id.to_string()));
        }
        if ledger.account(from_account).is_none() {
            return Err(WalletError::NotFound("Account".into()));
        }
        if amount > ledger.balance(from_account, currency_id) {
            return Err(WalletError::InsufficientBalance);
        }

        let usd_value = amount * rate;
        let account = ledger
            .account_mut(from_account)
            .ok_or_else(|| WalletError::NotFound("Account".into()))?;
        limits::check(account, usd_value, now)?;

        // Commit point: nothing below can fail.
        account.daily_spent += usd_value;
        account.monthly_spent += usd_value;

        let from_address = ledger.address(from_account, currency_id);
        ledger.debit(from_account, currency_id, amount)?;

        let tx = Transaction::new_pending(
            identity::generate_transaction_id(),
            from_address.into(),
            to_address.into(),
            currency_id.to_string(),
            amount,
            usd_value,
            from_account.to_string(),
            now,
        );
        let tx_id = tx.id.clone();

        tracing::info!(
            tx_id = %tx_id,
            account = %from_account,
            currency = %currency_id,
            amount,
            usd_value,
            "transfer admitted, awaiting admin approval"
        );

        self.queue.push(tx_id.clone());
        self.transactions.push(tx);
        Ok(tx_id)
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Approve a pending transaction.
    ///
    /// If the destination address belongs to an account in this system, the
    /// recipient is credited and a mirrored incoming record lands in their
    /// history. An external destination receives nothing — the debited
    /// funds simply leave the simulation.
    pub fn approve(
        &mut self,
        ledger: &mut AccountLedger,
        tx_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Transaction, WalletError> {
        let index = self.settleable_index(tx_id)?;
        self.queue.remove(tx_id);
        self.transactions[index].status = TxStatus::Completed;
        let settled = self.transactions[index].clone();

        let recipient =
            ledger.account_for_address(&settled.to_address.0, &settled.currency_id);
        match recipient {
            Some(to_account) => {
                ledger.credit(&to_account, &settled.currency_id, settled.amount)?;
                let mirror = Transaction::new_incoming(
                    identity::generate_transaction_id(),
                    &settled,
                    to_account.clone(),
                    now,
                );
                tracing::info!(
                    tx_id = %settled.id,
                    recipient = %to_account,
                    "transaction approved, recipient credited"
                );
                self.transactions.push(mirror);
            }
            None => {
                tracing::info!(
                    tx_id = %settled.id,
                    to = %settled.to_address,
                    "transaction approved for external address, no credit in-system"
                );
            }
        }
        Ok(settled)
    }

    /// Reject a pending transaction and unwind its admission.
    ///
    /// The sender's balance is refunded and the spent counters are rolled
    /// back by the USD value captured at submit time. If a window reset
    /// happened between submit and reject the counters can go negative;
    /// the display layer clamps at zero, so nothing leaks to users.
    pub fn reject(
        &mut self,
        ledger: &mut AccountLedger,
        tx_id: &str,
        reason: &str,
    ) -> Result<Transaction, WalletError> {
        let index = self.settleable_index(tx_id)?;
        self.queue.remove(tx_id);
        let tx = &mut self.transactions[index];
        tx.status = TxStatus::Rejected;
        tx.error_message = Some(reason.to_string());
        let settled = tx.clone();

        if let Some(from_account) = settled.from_account.as_deref() {
            ledger.credit(from_account, &settled.currency_id, settled.amount)?;
            if let Some(account) = ledger.account_mut(from_account) {
                account.daily_spent -= settled.usd_value;
                account.monthly_spent -= settled.usd_value;
            }
        }

        tracing::info!(
            tx_id = %settled.id,
            reason = %reason,
            "transaction rejected, sender refunded"
        );
        Ok(settled)
    }

    /// Locate a transaction that is still eligible for settlement.
    ///
    /// Unknown id → `NotFound`; known but terminal → `AlreadySettled`,
    /// so a double approve/reject is an explicit guarded error instead of
    /// a silent no-op or a double credit.
    fn settleable_index(&self, tx_id: &str) -> Result<usize, WalletError> {
        let index = self
            .transactions
            .iter()
            .position(|tx| tx.id == tx_id)
            .ok_or_else(|| WalletError::NotFound("Transaction".into()))?;
        if self.transactions[index].status.is_terminal() {
            return Err(WalletError::AlreadySettled);
        }
        Ok(index)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, tx_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == tx_id)
    }

    /// All transactions visible to one account, newest first.
    pub fn transactions_for(&self, account_id: &str) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| {
                (!tx.incoming && tx.from_account.as_deref() == Some(account_id))
                    || (tx.incoming && tx.to_account.as_deref() == Some(account_id))
            })
            .collect();
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        txs
    }

    /// Pending transactions in queue order, for the admin console.
    pub fn pending(&self) -> Vec<&Transaction> {
        self.queue
            .ids()
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    pub fn queue(&self) -> &AdminQueue {
        &self.queue
    }

    /// Total number of transaction records (including incoming mirrors).
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KycTier, LimitWindow};

    /// Tier `none` account with 1.0 BTC and a flat BTC rate of 50 USD, so
    /// spending the full balance lands exactly on half the daily limit.
    fn fixture() -> (TransactionEngine, AccountLedger, ExchangeRates, String) {
        let mut ledger = AccountLedger::new();
        let account = ledger.create_account(
            "sender@example.com".into(),
            "Send".into(),
            "Er".into(),
            Utc::now(),
        );
        ledger.initialize_wallet(&account.id).unwrap();
        ledger.credit(&account.id, "btc", 1.0).unwrap();

        let mut rates = ExchangeRates::default();
        rates.set("btc", 50.0).unwrap();

        (TransactionEngine::new(), ledger, rates, account.id)
    }

    fn add_recipient(ledger: &mut AccountLedger) -> (String, String) {
        let account = ledger.create_account(
            "recipient@example.com".into(),
            "Recv".into(),
            "Er".into(),
            Utc::now(),
        );
        ledger.initialize_wallet(&account.id).unwrap();
        let btc_address = ledger.address(&account.id, "btc");
        (account.id, btc_address)
    }

    #[test]
    fn submit_debits_immediately_and_accrues_counters() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, "1External", "btc", 1.0, now)
            .unwrap();

        assert_eq!(ledger.balance(&sender, "btc"), 0.0);
        let account = ledger.account(&sender).unwrap();
        assert_eq!(account.daily_spent, 50.0);
        assert_eq!(account.monthly_spent, 50.0);

        let tx = engine.get(&tx_id).unwrap();
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.usd_value, 50.0);
        assert_eq!(engine.pending().len(), 1);
    }

    #[test]
    fn submit_validation_order_and_kinds() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        assert_eq!(
            engine.submit(&mut ledger, &rates, &sender, "   ", "btc", 1.0, now),
            Err(WalletError::InvalidAddress)
        );
        assert_eq!(
            engine.submit(&mut ledger, &rates, &sender, "1Ext", "btc", 0.0, now),
            Err(WalletError::InvalidAmount)
        );
        assert_eq!(
            engine.submit(&mut ledger, &rates, &sender, "1Ext", "btc", f64::NAN, now),
            Err(WalletError::InvalidAmount)
        );
        assert_eq!(
            engine.submit(&mut ledger, &rates, &sender, "1Ext", "doge", 1.0, now),
            Err(WalletError::CurrencyUnsupported("doge".into()))
        );
        assert_eq!(
            engine.submit(&mut ledger, &rates, &sender, "1Ext", "btc", 2.0, now),
            Err(WalletError::InsufficientBalance)
        );
        assert!(matches!(
            engine.submit(&mut ledger, &rates, "user_ghost", "1Ext", "btc", 1.0, now),
            Err(WalletError::NotFound(_))
        ));

        // None of the failures moved any state.
        assert_eq!(ledger.balance(&sender, "btc"), 1.0);
        assert_eq!(ledger.account(&sender).unwrap().daily_spent, 0.0);
        assert!(engine.is_empty());
    }

    #[test]
    fn daily_limit_boundary_is_inclusive() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        // First 50 USD admitted.
        engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 1.0, now)
            .unwrap();

        // Fresh funds; 50 + 50 = 100 sits exactly at the daily ceiling.
        ledger.credit(&sender, "btc", 1.0).unwrap();
        engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 1.0, now)
            .unwrap();
        assert_eq!(ledger.account(&sender).unwrap().daily_spent, 100.0);

        // 100 + 50 = 150 > 100: over the line.
        ledger.credit(&sender, "btc", 1.0).unwrap();
        assert_eq!(
            engine.submit(&mut ledger, &rates, &sender, "1Ext", "btc", 1.0, now),
            Err(WalletError::LimitExceeded {
                window: LimitWindow::Daily
            })
        );
        // The failed attempt reserved nothing.
        assert_eq!(ledger.balance(&sender, "btc"), 1.0);
        assert_eq!(ledger.account(&sender).unwrap().daily_spent, 100.0);
    }

    #[test]
    fn reject_is_a_neutral_inverse_of_submit() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 1.0, now)
            .unwrap();
        let settled = engine.reject(&mut ledger, &tx_id, "bad address").unwrap();

        assert_eq!(settled.status, TxStatus::Rejected);
        assert_eq!(settled.error_message.as_deref(), Some("bad address"));
        assert_eq!(ledger.balance(&sender, "btc"), 1.0);
        let account = ledger.account(&sender).unwrap();
        assert_eq!(account.daily_spent, 0.0);
        assert_eq!(account.monthly_spent, 0.0);
        assert!(engine.queue().is_empty());
    }

    #[test]
    fn reject_refund_uses_submit_time_valuation() {
        let (mut engine, mut ledger, mut rates, sender) = fixture();
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 1.0, now)
            .unwrap();

        // Admin doubles the BTC rate while the transfer sits in the queue.
        rates.set("btc", 100.0).unwrap();
        engine.reject(&mut ledger, &tx_id, "changed my mind").unwrap();

        // Counters return exactly to zero, not to -50.
        let account = ledger.account(&sender).unwrap();
        assert_eq!(account.daily_spent, 0.0);
        assert_eq!(account.monthly_spent, 0.0);
    }

    #[test]
    fn approve_credits_known_recipient_and_mirrors_history() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let (recipient, recipient_addr) = add_recipient(&mut ledger);
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, &recipient_addr, "btc", 1.0, now)
            .unwrap();
        let settled = engine.approve(&mut ledger, &tx_id, now).unwrap();

        assert_eq!(settled.status, TxStatus::Completed);
        assert_eq!(ledger.balance(&recipient, "btc"), 1.0);

        // Value was relocated, not created: sender 0 + recipient 1 = 1.
        assert_eq!(
            ledger.balance(&sender, "btc") + ledger.balance(&recipient, "btc"),
            1.0
        );

        let history = engine.transactions_for(&recipient);
        assert_eq!(history.len(), 1);
        assert!(history[0].incoming);
        assert_eq!(history[0].status, TxStatus::Completed);
        assert_eq!(history[0].amount, 1.0);
    }

    #[test]
    fn approve_to_external_address_destroys_value() {
        // Current behavior, preserved deliberately: an unknown destination
        // gets no credit anywhere, the debited funds just leave the system.
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, "1CompletelyExternal", "btc", 1.0, now)
            .unwrap();
        engine.approve(&mut ledger, &tx_id, now).unwrap();

        assert_eq!(ledger.balance(&sender, "btc"), 0.0);
        // Only the original outgoing record exists, no mirror.
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn settlement_is_idempotent_guarded() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let (recipient, recipient_addr) = add_recipient(&mut ledger);
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, &recipient_addr, "btc", 1.0, now)
            .unwrap();
        engine.approve(&mut ledger, &tx_id, now).unwrap();

        // A second approve or a late reject must not double-settle.
        assert_eq!(
            engine.approve(&mut ledger, &tx_id, now),
            Err(WalletError::AlreadySettled)
        );
        assert_eq!(
            engine.reject(&mut ledger, &tx_id, "too late"),
            Err(WalletError::AlreadySettled)
        );
        assert_eq!(ledger.balance(&recipient, "btc"), 1.0);

        // A never-seen id is a plain not-found.
        assert!(matches!(
            engine.approve(&mut ledger, "tx_missing", now),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn queue_is_consumed_exactly_once() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        let tx_id = engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 0.5, now)
            .unwrap();
        assert_eq!(engine.queue().len(), 1);

        engine.reject(&mut ledger, &tx_id, "no").unwrap();
        assert!(engine.queue().is_empty());
        assert!(engine.pending().is_empty());
    }

    #[test]
    fn balances_stay_non_negative_across_a_mixed_sequence() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let (recipient, recipient_addr) = add_recipient(&mut ledger);
        let now = Utc::now();

        let t1 = engine
            .submit(&mut ledger, &rates, &sender, &recipient_addr, "btc", 0.6, now)
            .unwrap();
        let t2 = engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 0.4, now)
            .unwrap();
        engine.approve(&mut ledger, &t1, now).unwrap();
        engine.reject(&mut ledger, &t2, "nope").unwrap();

        for account in [&sender, &recipient] {
            for currency in ["btc", "eth", "usdt", "sol"] {
                assert!(ledger.balance(account, currency) >= 0.0);
            }
        }
        // Post-settlement ledger: sender kept the refunded 0.4, recipient 0.6.
        assert_eq!(ledger.balance(&sender, "btc"), 0.4);
        assert_eq!(ledger.balance(&recipient, "btc"), 0.6);
    }

    #[test]
    fn history_is_newest_first_per_account() {
        let (mut engine, mut ledger, rates, sender) = fixture();
        let now = Utc::now();

        let t1 = engine
            .submit(&mut ledger, &rates, &sender, "1Ext", "btc", 0.2, now)
            .unwrap();
        let t2 = engine
            .submit(
                &mut ledger,
                &rates,
                &sender,
                "1Ext",
                "btc",
                0.3,
                now + chrono::Duration::seconds(5),
            )
            .unwrap();

        let history = engine.transactions_for(&sender);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, t2);
        assert_eq!(history[1].id, t1);
    }
}
