//! # Governance Parameters
//!
//! Emission schedules and payout multipliers. Parameters are read-mostly:
//! they change only through governance-style updates, and every update is
//! validated before it is stored.
//!
//! ## Emission
//!
//! A [`RewardPeriod`] emits `rewards_per_second` of each listed denom to the
//! holders of one source key between `start` and `end`:
//!
//! ```text
//!            start                              end
//!   ──────────┼──────────────────────────────────┼──────────►  time
//!   no reward │  rate x seconds / total shares   │ no reward
//! ```
//!
//! ## Multipliers
//!
//! | Name   | Lockup periods | Payout factor |
//! |--------|----------------|---------------|
//! | small  | 1              | 0.2           |
//! | medium | 6              | 0.5           |
//! | large  | 12             | 1.0           |

use crate::claim::ClaimType;
use crate::coins::{validate_denom, Coins};
use crate::decimal::Dec;
use crate::error::{IncentiveError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emission schedule for one source key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPeriod {
    /// Whether the period emits at all
    #[serde(default = "default_true")]
    pub active: bool,

    /// Source key the period rewards
    pub source_key: String,

    /// Emission start
    pub start: DateTime<Utc>,

    /// Emission end
    pub end: DateTime<Utc>,

    /// Emission per second, per reward denom
    pub rewards_per_second: Coins,
}

fn default_true() -> bool {
    true
}

impl RewardPeriod {
    /// Create an active reward period
    pub fn new(
        source_key: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        rewards_per_second: Coins,
    ) -> Self {
        Self {
            active: true,
            source_key: source_key.into(),
            start,
            end,
            rewards_per_second,
        }
    }

    /// Validate the period
    pub fn validate(&self) -> Result<()> {
        if self.source_key.is_empty() {
            return Err(IncentiveError::InvalidRewardPeriod(
                "source key cannot be blank".to_string(),
            ));
        }
        if self.start >= self.end {
            return Err(IncentiveError::InvalidRewardPeriod(format!(
                "end period time {} cannot be before start time {}",
                self.end, self.start
            )));
        }
        for coin in self.rewards_per_second.iter() {
            validate_denom(&coin.denom).map_err(|_| {
                IncentiveError::InvalidRewardPeriod(format!("invalid reward amount: {}", coin))
            })?;
            if coin.amount == 0 {
                return Err(IncentiveError::InvalidRewardPeriod(format!(
                    "reward amount cannot be zero: {}",
                    coin
                )));
            }
        }
        Ok(())
    }
}

/// Reward periods of one category
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardPeriods(Vec<RewardPeriod>);

impl RewardPeriods {
    pub fn new(periods: Vec<RewardPeriod>) -> Self {
        Self(periods)
    }

    /// Period for a source key
    pub fn get(&self, source_key: &str) -> Option<&RewardPeriod> {
        self.0.iter().find(|rp| rp.source_key == source_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RewardPeriod> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every period and reject duplicated source keys
    pub fn validate(&self, claim_type: ClaimType) -> Result<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.0.len());
        for rp in &self.0 {
            if seen.contains(&rp.source_key.as_str()) {
                return Err(IncentiveError::DuplicatedRewardPeriod {
                    claim_type,
                    source_key: rp.source_key.clone(),
                });
            }
            rp.validate()?;
            seen.push(rp.source_key.as_str());
        }
        Ok(())
    }
}

/// Named payout selection applied at claim time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplier {
    /// Selection name
    pub name: String,

    /// Vesting lockup handed to the payout collaborator
    pub lockup_periods: u64,

    /// Fraction of unclaimed reward paid, in (0, 1]
    pub payout_factor: Dec,
}

impl Multiplier {
    pub fn new(name: impl Into<String>, lockup_periods: u64, payout_factor: Dec) -> Self {
        Self {
            name: name.into(),
            lockup_periods,
            payout_factor,
        }
    }

    /// Validate the multiplier
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(IncentiveError::InvalidMultiplier(
                "name cannot be blank".to_string(),
            ));
        }
        if self.payout_factor.is_zero() || self.payout_factor > Dec::ONE {
            return Err(IncentiveError::InvalidMultiplier(format!(
                "{}: payout factor {} must be in (0, 1]",
                self.name, self.payout_factor
            )));
        }
        Ok(())
    }
}

/// Multipliers available for one reward denom
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipliersPerDenom {
    /// Reward denom
    pub denom: String,

    /// Selections offered for the denom
    pub multipliers: Vec<Multiplier>,
}

impl MultipliersPerDenom {
    pub fn new(denom: impl Into<String>, multipliers: Vec<Multiplier>) -> Self {
        Self {
            denom: denom.into(),
            multipliers,
        }
    }

    /// Multiplier by name
    pub fn get(&self, name: &str) -> Option<&Multiplier> {
        self.multipliers.iter().find(|m| m.name == name)
    }

    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.denom)?;
        let mut seen: Vec<&str> = Vec::with_capacity(self.multipliers.len());
        for m in &self.multipliers {
            if seen.contains(&m.name.as_str()) {
                return Err(IncentiveError::InvalidMultiplier(format!(
                    "duplicate multiplier name {} for {}",
                    m.name, self.denom
                )));
            }
            m.validate()?;
            seen.push(m.name.as_str());
        }
        Ok(())
    }
}

/// Complete parameter set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub minting_reward_periods: RewardPeriods,

    #[serde(default)]
    pub supply_reward_periods: RewardPeriods,

    #[serde(default)]
    pub borrow_reward_periods: RewardPeriods,

    #[serde(default)]
    pub delegator_reward_periods: RewardPeriods,

    #[serde(default)]
    pub swap_reward_periods: RewardPeriods,

    #[serde(default)]
    pub savings_reward_periods: RewardPeriods,

    #[serde(default)]
    pub earn_reward_periods: RewardPeriods,

    /// Payout selections per reward denom
    #[serde(default)]
    pub claim_multipliers: Vec<MultipliersPerDenom>,

    /// Claims submitted after this time are rejected
    #[serde(default)]
    pub claim_end: DateTime<Utc>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            minting_reward_periods: RewardPeriods::default(),
            supply_reward_periods: RewardPeriods::default(),
            borrow_reward_periods: RewardPeriods::default(),
            delegator_reward_periods: RewardPeriods::default(),
            swap_reward_periods: RewardPeriods::default(),
            savings_reward_periods: RewardPeriods::default(),
            earn_reward_periods: RewardPeriods::default(),
            claim_multipliers: Vec::new(),
            // Unix epoch: claims stay closed until governance sets an end
            claim_end: DateTime::<Utc>::default(),
        }
    }
}

impl Params {
    /// Reward periods of a category
    pub fn reward_periods(&self, claim_type: ClaimType) -> &RewardPeriods {
        match claim_type {
            ClaimType::Minting => &self.minting_reward_periods,
            ClaimType::Supply => &self.supply_reward_periods,
            ClaimType::Borrow => &self.borrow_reward_periods,
            ClaimType::Delegator => &self.delegator_reward_periods,
            ClaimType::Swap => &self.swap_reward_periods,
            ClaimType::Savings => &self.savings_reward_periods,
            ClaimType::Earn => &self.earn_reward_periods,
        }
    }

    /// Mutable reward periods of a category
    pub fn reward_periods_mut(&mut self, claim_type: ClaimType) -> &mut RewardPeriods {
        match claim_type {
            ClaimType::Minting => &mut self.minting_reward_periods,
            ClaimType::Supply => &mut self.supply_reward_periods,
            ClaimType::Borrow => &mut self.borrow_reward_periods,
            ClaimType::Delegator => &mut self.delegator_reward_periods,
            ClaimType::Swap => &mut self.swap_reward_periods,
            ClaimType::Savings => &mut self.savings_reward_periods,
            ClaimType::Earn => &mut self.earn_reward_periods,
        }
    }

    /// Reward period of a category for a source key
    pub fn reward_period(&self, claim_type: ClaimType, source_key: &str) -> Option<&RewardPeriod> {
        self.reward_periods(claim_type).get(source_key)
    }

    /// Multiplier for a reward denom by name
    pub fn multiplier(&self, denom: &str, name: &str) -> Option<&Multiplier> {
        self.claim_multipliers
            .iter()
            .find(|dm| dm.denom == denom)
            .and_then(|dm| dm.get(name))
    }

    /// Validate the whole parameter set
    pub fn validate(&self) -> Result<()> {
        for claim_type in ClaimType::ALL {
            self.reward_periods(claim_type).validate(claim_type)?;
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.claim_multipliers.len());
        for dm in &self.claim_multipliers {
            if seen.contains(&dm.denom.as_str()) {
                return Err(IncentiveError::InvalidMultiplier(format!(
                    "duplicate multipliers for denom {}",
                    dm.denom
                )));
            }
            dm.validate()?;
            seen.push(dm.denom.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::Coin;
    use chrono::TimeZone;

    fn time(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    fn rewards(amount: u128) -> Coins {
        Coins::from_coins(vec![Coin::new("jinx", amount)]).expect("coins")
    }

    fn period(key: &str) -> RewardPeriod {
        RewardPeriod::new(key, time(0), time(1_000), rewards(122_354))
    }

    #[test]
    fn test_valid_period() {
        assert!(period("bnb").validate().is_ok());
    }

    #[test]
    fn test_period_end_before_start() {
        let rp = RewardPeriod::new("bnb", time(1_000), time(0), rewards(1));
        let err = rp.validate().expect_err("must fail");
        assert!(err.to_string().contains("cannot be before start time"));
    }

    #[test]
    fn test_period_blank_source_key() {
        assert!(period("").validate().is_err());
    }

    #[test]
    fn test_period_zero_reward() {
        let mut rp = period("bnb");
        rp.rewards_per_second = serde_json::from_str(r#"{"jinx":"0"}"#).expect("coins");
        let err = rp.validate().expect_err("must fail");
        assert!(err.to_string().contains("reward amount cannot be zero"));
    }

    #[test]
    fn test_duplicated_reward_period() {
        let periods = RewardPeriods::new(vec![period("bnb"), period("bnb")]);
        let err = periods.validate(ClaimType::Supply).expect_err("must fail");
        assert!(err.to_string().contains("Duplicated reward period"));
    }

    #[test]
    fn test_multiplier_bounds() {
        let one: Dec = "1".parse().expect("dec");
        let half: Dec = "0.5".parse().expect("dec");
        let over: Dec = "1.5".parse().expect("dec");

        assert!(Multiplier::new("large", 12, one).validate().is_ok());
        assert!(Multiplier::new("medium", 6, half).validate().is_ok());
        assert!(Multiplier::new("zero", 0, Dec::ZERO).validate().is_err());
        assert!(Multiplier::new("over", 0, over).validate().is_err());
        assert!(Multiplier::new("", 0, one).validate().is_err());
    }

    #[test]
    fn test_multiplier_lookup() {
        let mut params = Params::default();
        params.claim_multipliers = vec![MultipliersPerDenom::new(
            "jinx",
            vec![Multiplier::new("large", 12, Dec::ONE)],
        )];

        assert!(params.multiplier("jinx", "large").is_some());
        assert!(params.multiplier("jinx", "small").is_none());
        assert!(params.multiplier("ufury", "large").is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_duplicate_multiplier_denoms() {
        let mut params = Params::default();
        let dm = MultipliersPerDenom::new("jinx", vec![Multiplier::new("large", 12, Dec::ONE)]);
        params.claim_multipliers = vec![dm.clone(), dm];
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_periods_by_category() {
        let mut params = Params::default();
        *params.reward_periods_mut(ClaimType::Borrow) = RewardPeriods::new(vec![period("bnb")]);

        assert!(params.reward_period(ClaimType::Borrow, "bnb").is_some());
        assert!(params.reward_period(ClaimType::Supply, "bnb").is_none());
    }
}
