// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Data Models
//!
//! Entities shared by the wallet core and the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Accounts**: identity, KYC tier, and spending counters
//! - **Wallet entries**: per-currency address + balance pairs
//! - **Transactions**: transfer attempts moving through the settlement
//!   state machine
//! - **Support tickets**: ticket threads handled from the admin console

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::limits;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Wallet address wrapper.
///
/// Provides type safety for generated addresses throughout the API. The
/// format depends on the currency: BTC-style base58 with a leading `1`,
/// `0x` + 40 hex for ETH/USDT, bare base58 for SOL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// KYC Tiers and Spending Limits
// =============================================================================

/// Verification level gating an account's spending ceilings.
///
/// The derived `Ord` follows declaration order, which is the required total
/// order `none < basic < verified < premium`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum KycTier {
    None,
    Basic,
    Verified,
    Premium,
}

impl Default for KycTier {
    fn default() -> Self {
        Self::None
    }
}

/// USD spending ceilings for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TierLimits {
    /// Daily ceiling in USD.
    pub daily: f64,
    /// Monthly ceiling in USD.
    pub monthly: f64,
}

/// Which spending window a limit check failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LimitWindow {
    Daily,
    Monthly,
}

impl std::fmt::Display for LimitWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// KYC submission data attached to an account.
///
/// Document/selfie image capture is a client concern and is not modelled
/// here; only the resulting metadata is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct KycData {
    /// Current verification level.
    pub level: KycTier,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Accounts
// =============================================================================

/// A wallet account with KYC-derived spending limits.
///
/// `daily_limit`/`monthly_limit` are a pure function of `kyc.level` and are
/// recomputed whenever the tier changes. The spent counters accrue USD value
/// on every admitted transfer and roll over lazily (see `limits`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// Unique account identifier (`user_` + 16 hex chars).
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub kyc: KycData,
    /// Daily USD ceiling derived from the KYC tier.
    pub daily_limit: f64,
    /// Monthly USD ceiling derived from the KYC tier.
    pub monthly_limit: f64,
    /// USD spent in the current daily window.
    pub daily_spent: f64,
    /// USD spent in the current monthly window.
    pub monthly_spent: f64,
    /// Start of the current daily window; updated by the lazy reset.
    pub last_reset: DateTime<Utc>,
}

impl Account {
    /// Create a fresh account at tier `none` with zeroed counters.
    pub fn new(
        id: String,
        email: String,
        first_name: String,
        last_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        let tier_limits = limits::limits_for(KycTier::None);
        Self {
            id,
            email,
            created_at: now,
            kyc: KycData {
                level: KycTier::None,
                first_name,
                last_name,
                ..KycData::default()
            },
            daily_limit: tier_limits.daily,
            monthly_limit: tier_limits.monthly,
            daily_spent: 0.0,
            monthly_spent: 0.0,
            last_reset: now,
        }
    }
}

// =============================================================================
// Wallet Entries
// =============================================================================

/// One (currency, address, balance) triple owned by an account.
///
/// Balances are mutated only through the ledger's debit/credit operations
/// and never go below zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletEntry {
    pub currency_id: String,
    pub address: WalletAddress,
    pub balance: f64,
}

// =============================================================================
// Transactions
// =============================================================================

/// Settlement state of a transfer attempt.
///
/// `Pending` is the only constructible initial state; both other states are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Completed,
    Rejected,
}

impl TxStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

/// One transfer attempt, retained forever as history.
///
/// After creation only `status` (and `error_message` on rejection) change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Unique transaction identifier (`tx_` + 32 hex chars).
    pub id: String,
    pub from_address: WalletAddress,
    pub to_address: WalletAddress,
    pub currency_id: String,
    /// Amount in currency-native units; immutable after creation.
    pub amount: f64,
    /// USD valuation captured at submit time; the rejection refund uses this
    /// rather than re-pricing at the current rate.
    pub usd_value: f64,
    pub status: TxStatus,
    pub created_at: DateTime<Utc>,
    /// True for the mirrored record written into a recipient's history.
    pub incoming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,
}

impl Transaction {
    /// Create an outgoing transfer in the `pending` state.
    #[allow(clippy::too_many_arguments)]
    pub fn new_pending(
        id: String,
        from_address: WalletAddress,
        to_address: WalletAddress,
        currency_id: String,
        amount: f64,
        usd_value: f64,
        from_account: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_address,
            to_address,
            currency_id,
            amount,
            usd_value,
            status: TxStatus::Pending,
            created_at: now,
            incoming: false,
            error_message: None,
            from_account: Some(from_account),
            to_account: None,
        }
    }

    /// Create the mirrored incoming record for a known recipient; these are
    /// born `completed`.
    pub fn new_incoming(
        id: String,
        source: &Transaction,
        to_account: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_address: source.from_address.clone(),
            to_address: source.to_address.clone(),
            currency_id: source.currency_id.clone(),
            amount: source.amount,
            usd_value: source.usd_value,
            status: TxStatus::Completed,
            created_at: now,
            incoming: true,
            error_message: None,
            from_account: source.from_account.clone(),
            to_account: Some(to_account),
        }
    }
}

// =============================================================================
// Support Tickets
// =============================================================================

/// Lifecycle of a support ticket thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Replied,
    Closed,
}

/// A reply inside a ticket thread.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketReply {
    pub id: String,
    pub message: String,
    /// True when written from the admin console.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A support ticket raised by an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupportTicket {
    /// Unique ticket identifier (`ticket_` + 12 hex chars).
    pub id: String,
    pub account_id: String,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub replies: Vec<TicketReply>,
    pub created_at: DateTime<Utc>,
}
