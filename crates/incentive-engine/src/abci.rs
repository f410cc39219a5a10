//! Per-block accumulation

use crate::accumulator::Accumulator;
use crate::keeper::Keeper;
use chrono::{DateTime, Utc};
use incentive_core::{ClaimType, Result, RewardPeriod};
use incentive_storage::KvStore;
use tracing::debug;

impl<S: KvStore> Keeper<S> {
    /// Accumulate every configured reward period of every category, once.
    pub fn begin_blocker(&self, block_time: DateTime<Utc>) -> Result<()> {
        let params = self.get_params();
        for claim_type in ClaimType::ALL {
            for period in params.reward_periods(claim_type).iter() {
                self.accumulate_rewards(claim_type, period, block_time)?;
            }
        }
        Ok(())
    }

    /// Advance the global indexes of one reward period to `block_time`.
    ///
    /// The first accrual of a source key only records the block time.
    ///
    /// # Panics
    ///
    /// Panics when `block_time` is before the stored accrual time.
    pub fn accumulate_rewards(
        &self,
        claim_type: ClaimType,
        period: &RewardPeriod,
        block_time: DateTime<Utc>,
    ) -> Result<()> {
        let source_key = period.source_key.as_str();
        let previous = self
            .get_previous_accrual_time(claim_type, source_key)
            .unwrap_or(block_time);
        if block_time < previous {
            panic!(
                "{} accrual time moved backward for source key {}: previous {}, block {}",
                claim_type, source_key, previous, block_time
            );
        }

        let indexes = self
            .get_reward_indexes(claim_type, source_key)
            .unwrap_or_default();
        let total_shares = self
            .collaborators()
            .source(claim_type)?
            .total_source_shares(source_key);

        let mut acc = Accumulator::new(previous, indexes);
        acc.accumulate(period, total_shares, block_time)?;

        self.set_previous_accrual_time(claim_type, source_key, acc.previous_accumulation_time)?;
        // An empty set is never stored so unrewarded keys stay absent
        if !acc.indexes.is_empty() {
            self.set_reward_indexes(claim_type, source_key, &acc.indexes)?;
        }

        debug!(
            %claim_type,
            source_key,
            total_shares = %total_shares,
            indexes = ?acc.indexes,
            "Accumulated rewards"
        );
        Ok(())
    }
}
