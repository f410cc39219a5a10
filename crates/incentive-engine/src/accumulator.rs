//! # Reward Accumulation
//!
//! Advances one source key's global reward indexes by one step.
//!
//! ```text
//!   previous ──────────────── current            accrual interval
//!        start ─────────── end                   reward period
//!        └──── window ────┘                      rewarded seconds
//!
//!   increase(denom) = rate(denom) x window seconds / total source shares
//! ```
//!
//! The accrual time always moves to `current`, even when the window is
//! empty, so an interval outside the period is never rewarded later.

use chrono::{DateTime, Utc};
use incentive_core::{Coins, Dec, IncentiveError, Result, RewardIndexes, RewardPeriod};

/// Global indexes of one source key together with their accrual time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    /// Time the indexes were last advanced to
    pub previous_accumulation_time: DateTime<Utc>,

    /// Cumulative reward factors
    pub indexes: RewardIndexes,
}

impl Accumulator {
    pub fn new(previous_accumulation_time: DateTime<Utc>, indexes: RewardIndexes) -> Self {
        Self {
            previous_accumulation_time,
            indexes,
        }
    }

    /// Advance the indexes to `current_time`.
    ///
    /// # Panics
    ///
    /// Panics when `current_time` is before the previous accumulation time.
    pub fn accumulate(
        &mut self,
        period: &RewardPeriod,
        total_source_shares: Dec,
        current_time: DateTime<Utc>,
    ) -> Result<()> {
        if current_time < self.previous_accumulation_time {
            panic!(
                "accumulation time moved backward for source key {}: previous {}, current {}",
                period.source_key, self.previous_accumulation_time, current_time
            );
        }

        let seconds = if period.active {
            time_elapsed_within_limits(
                self.previous_accumulation_time,
                current_time,
                period.start,
                period.end,
            )
        } else {
            0
        };

        let increment = reward_factor_increment(&period.rewards_per_second, total_source_shares, seconds)?;
        for ri in increment.iter() {
            let old = self.indexes.get(&ri.denom).unwrap_or(Dec::ZERO);
            let new = old.checked_add(ri.factor).ok_or_else(|| {
                IncentiveError::Overflow(format!(
                    "reward factor for {} on {}",
                    ri.denom, period.source_key
                ))
            })?;
            self.indexes = self.indexes.with(&ri.denom, new);
        }

        self.previous_accumulation_time = current_time;
        Ok(())
    }
}

/// Whole seconds of overlap between `[input_start, input_end]` and
/// `[limit_min, limit_max]`.
///
/// Counts the whole-second boundaries crossed, so consecutive intervals
/// sum to the seconds between the first start and the last end and a
/// sub-second remainder is counted by the interval that completes it.
pub fn time_elapsed_within_limits(
    input_start: DateTime<Utc>,
    input_end: DateTime<Utc>,
    limit_min: DateTime<Utc>,
    limit_max: DateTime<Utc>,
) -> u64 {
    let start = input_start.max(limit_min);
    let end = input_end.min(limit_max);
    if end <= start {
        return 0;
    }

    // end > start, so the floored difference is never negative
    (end.timestamp() - start.timestamp()) as u64
}

/// Per-share increase of each reward factor over `seconds`.
///
/// Empty when no shares are outstanding or no time elapsed.
pub fn reward_factor_increment(
    rewards_per_second: &Coins,
    total_source_shares: Dec,
    seconds: u64,
) -> Result<RewardIndexes> {
    if total_source_shares.is_zero() || seconds == 0 {
        return Ok(RewardIndexes::new());
    }

    let mut increment = RewardIndexes::new();
    for coin in rewards_per_second.iter() {
        let emitted = coin
            .amount
            .checked_mul(u128::from(seconds))
            .ok_or_else(|| IncentiveError::Overflow(format!("emission of {} over {}s", coin, seconds)))?;
        let factor = Dec::from_int(emitted)
            .checked_quo(total_source_shares)
            .ok_or_else(|| {
                IncentiveError::Overflow(format!(
                    "reward factor increment {} / {}",
                    emitted, total_source_shares
                ))
            })?;
        increment = increment.with(&coin.denom, factor);
    }
    Ok(increment)
}
