// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KYC-tiered spending limit policy.
//!
//! Limits are a static per-tier table; spending counters accrue USD value
//! and roll over *lazily*: the reset is evaluated at the top of every spend
//! check rather than by a background timer. An account that is never
//! touched keeps stale counters until its next transfer attempt; that is
//! intentional, not a bug to fix here (see DESIGN.md).

use chrono::{DateTime, Utc};

use crate::error::WalletError;
use crate::models::{Account, KycTier, LimitWindow, TierLimits};

/// Whole days after which the monthly counter also resets.
const MONTHLY_RESET_DAYS: i64 = 30;

/// USD ceilings per tier. Strictly increasing across the tier order.
pub fn limits_for(tier: KycTier) -> TierLimits {
    match tier {
        KycTier::None => TierLimits {
            daily: 100.0,
            monthly: 500.0,
        },
        KycTier::Basic => TierLimits {
            daily: 1_000.0,
            monthly: 5_000.0,
        },
        KycTier::Verified => TierLimits {
            daily: 10_000.0,
            monthly: 50_000.0,
        },
        KycTier::Premium => TierLimits {
            daily: 100_000.0,
            monthly: 500_000.0,
        },
    }
}

/// Recompute an account's ceilings from its current tier. Called whenever
/// the tier changes; spent counters are left untouched.
pub fn apply_tier(account: &mut Account) {
    let tier_limits = limits_for(account.kyc.level);
    account.daily_limit = tier_limits.daily;
    account.monthly_limit = tier_limits.monthly;
}

/// Lazy window rollover.
///
/// If at least one whole day elapsed since `last_reset`, the daily counter
/// is zeroed and the window restarts at `now`; at thirty or more elapsed
/// days the monthly counter is zeroed as well.
pub fn reset_if_elapsed(account: &mut Account, now: DateTime<Utc>) {
    let elapsed_days = (now - account.last_reset).num_days();
    if elapsed_days >= 1 {
        account.daily_spent = 0.0;
        if elapsed_days >= MONTHLY_RESET_DAYS {
            account.monthly_spent = 0.0;
        }
        account.last_reset = now;
    }
}

/// Remaining USD allowance per window, post-reset, clamped at zero for
/// display. (Counters can legitimately exceed limits after a tier
/// downgrade or a post-reset refund.)
pub fn remaining(account: &mut Account, now: DateTime<Utc>) -> TierLimits {
    reset_if_elapsed(account, now);
    TierLimits {
        daily: (account.daily_limit - account.daily_spent).max(0.0),
        monthly: (account.monthly_limit - account.monthly_spent).max(0.0),
    }
}

/// Admission check for a transfer of `usd_value`.
///
/// Admitted iff both windows stay within their ceilings, boundary
/// inclusive. All-or-nothing; the counters themselves are not touched
/// here.
pub fn check(
    account: &mut Account,
    usd_value: f64,
    now: DateTime<Utc>,
) -> Result<(), WalletError> {
    reset_if_elapsed(account, now);

    if account.daily_spent + usd_value > account.daily_limit {
        return Err(WalletError::LimitExceeded {
            window: LimitWindow::Daily,
        });
    }
    if account.monthly_spent + usd_value > account.monthly_limit {
        return Err(WalletError::LimitExceeded {
            window: LimitWindow::Monthly,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn account_at(tier: KycTier, now: DateTime<Utc>) -> Account {
        let mut account = Account::new(
            "user_t".into(),
            "t@example.com".into(),
            "Test".into(),
            "User".into(),
            now,
        );
        account.kyc.level = tier;
        apply_tier(&mut account);
        account
    }

    #[test]
    fn tier_limits_strictly_increase() {
        let tiers = [
            KycTier::None,
            KycTier::Basic,
            KycTier::Verified,
            KycTier::Premium,
        ];
        for pair in tiers.windows(2) {
            let lower = limits_for(pair[0]);
            let upper = limits_for(pair[1]);
            assert!(upper.daily > lower.daily);
            assert!(upper.monthly > lower.monthly);
        }
    }

    #[test]
    fn boundary_is_inclusive() {
        let now = Utc::now();
        let mut account = account_at(KycTier::None, now);
        account.daily_spent = 50.0;
        account.monthly_spent = 50.0;

        // 50 + 50 = 100 is exactly at the daily limit: admitted.
        assert!(check(&mut account, 50.0, now).is_ok());

        // 50 + 51 > 100: the daily window is reported.
        assert_eq!(
            check(&mut account, 51.0, now),
            Err(WalletError::LimitExceeded {
                window: LimitWindow::Daily
            })
        );
    }

    #[test]
    fn monthly_window_reported_when_daily_fits() {
        let now = Utc::now();
        let mut account = account_at(KycTier::None, now);
        account.monthly_spent = 450.0;

        // 60 fits the daily ceiling of 100 but breaks 450 + 60 > 500.
        assert_eq!(
            check(&mut account, 60.0, now),
            Err(WalletError::LimitExceeded {
                window: LimitWindow::Monthly
            })
        );
    }

    #[test]
    fn one_day_rollover_clears_daily_only() {
        let start = Utc::now();
        let mut account = account_at(KycTier::Basic, start);
        account.daily_spent = 900.0;
        account.monthly_spent = 3_000.0;

        let next_day = start + Duration::days(1);
        reset_if_elapsed(&mut account, next_day);

        assert_eq!(account.daily_spent, 0.0);
        assert_eq!(account.monthly_spent, 3_000.0);
        assert_eq!(account.last_reset, next_day);
    }

    #[test]
    fn thirty_day_rollover_clears_both_windows() {
        let start = Utc::now();
        let mut account = account_at(KycTier::Basic, start);
        account.daily_spent = 900.0;
        account.monthly_spent = 3_000.0;

        let later = start + Duration::days(30);
        reset_if_elapsed(&mut account, later);

        assert_eq!(account.daily_spent, 0.0);
        assert_eq!(account.monthly_spent, 0.0);
    }

    #[test]
    fn untouched_counters_stay_stale_within_a_day() {
        let start = Utc::now();
        let mut account = account_at(KycTier::Basic, start);
        account.daily_spent = 900.0;

        reset_if_elapsed(&mut account, start + Duration::hours(23));
        assert_eq!(account.daily_spent, 900.0);
        assert_eq!(account.last_reset, start);
    }

    #[test]
    fn check_applies_reset_before_judging() {
        let start = Utc::now();
        let mut account = account_at(KycTier::None, start);
        account.daily_spent = 100.0; // daily ceiling fully used

        // Same day: rejected.
        assert!(check(&mut account, 1.0, start).is_err());
        // Next day the daily window rolled over.
        assert!(check(&mut account, 1.0, start + Duration::days(1)).is_ok());
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let now = Utc::now();
        let mut account = account_at(KycTier::None, now);
        account.daily_spent = 250.0; // over the ceiling, e.g. after a downgrade

        let left = remaining(&mut account, now);
        assert_eq!(left.daily, 0.0);
        assert_eq!(left.monthly, 500.0);
    }

    #[test]
    fn apply_tier_recomputes_limits() {
        let now = Utc::now();
        let mut account = account_at(KycTier::None, now);
        assert_eq!(account.daily_limit, 100.0);

        account.kyc.level = KycTier::Verified;
        apply_tier(&mut account);
        assert_eq!(account.daily_limit, 10_000.0);
        assert_eq!(account.monthly_limit, 50_000.0);
    }
}
