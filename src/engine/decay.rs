//! Time Decay
//!
//! Proofs and penalties lose value linearly with age: each full day removes
//! one percent of the original amount, so an event is fully decayed after
//! 100 days. All arithmetic is integer-only so results are bitwise stable
//! across platforms.

use chrono::{DateTime, Utc};

use crate::engine::DECAY_PER_DAY_PERCENT;

/// Elapsed full days after which an amount has decayed to zero.
const FULL_DECAY_DAYS: u64 = 100 / DECAY_PER_DAY_PERCENT;

/// Returns `amount` reduced by one percent of its original value per full
/// day elapsed between `event_time` and `eval_time`.
///
/// Partial days do not decay. Event timestamps in the future (or equal to
/// `eval_time`) leave the amount untouched. The result never goes below 0.
pub fn decayed_amount(amount: u64, event_time: DateTime<Utc>, eval_time: DateTime<Utc>) -> u64 {
    let days = eval_time.signed_duration_since(event_time).num_days();
    if days <= 0 {
        return amount;
    }

    let days = (days as u64).min(FULL_DECAY_DAYS);
    // u128 keeps the product exact for amounts near u64::MAX.
    let cut = (amount as u128 * days as u128 * DECAY_PER_DAY_PERCENT as u128 / 100) as u64;
    amount.saturating_sub(cut)
}
