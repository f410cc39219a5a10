//! # Yield Estimation
//!
//! Annualized yield of a reward period, for display only:
//!
//! ```text
//!         Σ rate(denom) x price(denom)  x  seconds per year
//!   APY = ─────────────────────────────────────────────────
//!              total source shares x price(source key)
//! ```
//!
//! Prices come from the injected feed under market ids built by
//! [`ApyConfig::market_id`](crate::config::ApyConfig::market_id). Price
//! lookup failures propagate; only an empty source yields zero.

use crate::keeper::Keeper;
use incentive_core::{ClaimType, Dec, IncentiveError, Result, RewardPeriod, SECONDS_PER_YEAR};
use incentive_storage::KvStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Yield of one source key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apy {
    /// Source key
    pub source_key: String,

    /// Annualized yield as a fraction
    pub apy: Dec,
}

impl<S: KvStore> Keeper<S> {
    /// APY of the reward period configured for `source_key`
    pub fn get_apy(&self, claim_type: ClaimType, source_key: &str) -> Result<Dec> {
        let period = self
            .get_reward_period(claim_type, source_key)
            .ok_or_else(|| IncentiveError::RewardPeriodNotFound {
                claim_type,
                source_key: source_key.to_string(),
            })?;
        let total_shares = self
            .collaborators()
            .source(claim_type)?
            .total_source_shares(source_key);

        self.apy_for_period(&period, total_shares)
    }

    /// APY of every reward period of a category
    pub fn get_apys(&self, claim_type: ClaimType) -> Result<Vec<Apy>> {
        let params = self.get_params();
        let source = self.collaborators().source(claim_type)?;

        params
            .reward_periods(claim_type)
            .iter()
            .map(|period| {
                let total_shares = source.total_source_shares(&period.source_key);
                Ok(Apy {
                    source_key: period.source_key.clone(),
                    apy: self.apy_for_period(period, total_shares)?,
                })
            })
            .collect()
    }

    /// APY of `period` given the total shares of its source key
    pub fn apy_for_period(&self, period: &RewardPeriod, total_shares: Dec) -> Result<Dec> {
        if total_shares.is_zero() {
            return Ok(Dec::ZERO);
        }

        let overflow = || IncentiveError::Overflow(format!("APY of {}", period.source_key));

        let source_price = self.price_of(&period.source_key)?;
        let total_value = total_shares.checked_mul(source_price).ok_or_else(overflow)?;
        if total_value.is_zero() {
            return Ok(Dec::ZERO);
        }

        let mut rewards_value = Dec::ZERO;
        for coin in period.rewards_per_second.iter() {
            let price = self.price_of(&coin.denom)?;
            let value = price.checked_mul_int(coin.amount).ok_or_else(overflow)?;
            rewards_value = rewards_value.checked_add(value).ok_or_else(overflow)?;
        }

        let annual = rewards_value
            .checked_mul_int(u128::from(SECONDS_PER_YEAR))
            .ok_or_else(overflow)?;
        let apy = annual.checked_quo(total_value).ok_or_else(overflow)?;

        debug!(source_key = %period.source_key, apy = %apy, "Computed APY");
        Ok(apy)
    }

    fn price_of(&self, denom: &str) -> Result<Dec> {
        let market_id = self.apy_config().market_id(denom);
        self.collaborators()
            .price_feed()?
            .current_price(&market_id)
            .map_err(|e| IncentiveError::PriceUnavailable {
                market_id,
                reason: e.to_string(),
            })
    }
}
