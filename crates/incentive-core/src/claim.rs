//! # Claims
//!
//! One claim exists per owner per reward category. It carries the rewards
//! earned but not yet paid out, and the owner's last synchronized snapshot of
//! the global reward indexes for every source key they hold.

use crate::coins::Coins;
use crate::error::{IncentiveError, Result};
use crate::index::{MultiRewardIndexes, RewardIndexes};
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reward category, one per source of economic activity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// Minting the stablecoin against CDP collateral
    Minting,
    /// Supplying to the money market
    Supply,
    /// Borrowing from the money market
    Borrow,
    /// Delegating stake to validators
    Delegator,
    /// Providing AMM liquidity
    Swap,
    /// Savings deposits; accumulates but is not claimable
    Savings,
    /// Depositing into yield vaults
    Earn,
}

impl ClaimType {
    /// Every category, in accumulation order
    pub const ALL: [ClaimType; 7] = [
        Self::Minting,
        Self::Supply,
        Self::Borrow,
        Self::Delegator,
        Self::Swap,
        Self::Savings,
        Self::Earn,
    ];

    /// Get category name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minting => "minting",
            Self::Supply => "supply",
            Self::Borrow => "borrow",
            Self::Delegator => "delegator",
            Self::Swap => "swap",
            Self::Savings => "savings",
            Self::Earn => "earn",
        }
    }

    /// Whether accumulated rewards may be paid out
    pub fn is_claimable(&self) -> bool {
        !matches!(self, Self::Savings)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An owner's unclaimed rewards and index snapshots in one category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Category
    pub claim_type: ClaimType,

    /// Reward owner
    pub owner: Address,

    /// Rewards earned but not yet paid
    pub reward: Coins,

    /// Last synchronized global indexes, by source key
    pub reward_indexes: MultiRewardIndexes,
}

impl Claim {
    /// Create a claim
    pub fn new(
        claim_type: ClaimType,
        owner: Address,
        reward: Coins,
        reward_indexes: MultiRewardIndexes,
    ) -> Self {
        Self {
            claim_type,
            owner,
            reward,
            reward_indexes,
        }
    }

    /// Create an empty claim
    pub fn empty(claim_type: ClaimType, owner: Address) -> Self {
        Self::new(claim_type, owner, Coins::new(), MultiRewardIndexes::new())
    }

    /// Snapshot for a source key, if tracked
    pub fn snapshot(&self, source_key: &str) -> Option<&RewardIndexes> {
        self.reward_indexes.get(source_key)
    }

    /// Source keys with a snapshot
    pub fn source_keys(&self) -> Vec<String> {
        self.reward_indexes.source_keys()
    }

    /// Whether any reward is still owed
    pub fn has_rewards(&self) -> bool {
        !self.reward.is_zero()
    }

    /// Validate the claim contents
    pub fn validate(&self) -> Result<()> {
        if self.owner == Address::default() {
            return Err(IncentiveError::InvalidAddress(
                "claim owner cannot be empty".to_string(),
            ));
        }
        self.reward.validate()?;
        self.reward_indexes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::Coin;
    use crate::decimal::Dec;

    #[test]
    fn test_savings_not_claimable() {
        assert!(!ClaimType::Savings.is_claimable());
        assert!(ClaimType::ALL
            .iter()
            .filter(|ct| **ct != ClaimType::Savings)
            .all(|ct| ct.is_claimable()));
    }

    #[test]
    fn test_claim_type_names_unique() {
        let mut names: Vec<&str> = ClaimType::ALL.iter().map(|ct| ct.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ClaimType::ALL.len());
    }

    #[test]
    fn test_claim_validate() {
        let claim = Claim::empty(ClaimType::Supply, Address::default());
        assert!(claim.validate().is_err());

        let owner = Address::new([1; 20]);
        let indexes = MultiRewardIndexes::new()
            .with("bnb", RewardIndexes::new().with("jinx", Dec::ONE));
        let reward = Coins::from_coins(vec![Coin::new("jinx", 10)]).expect("coins");
        let claim = Claim::new(ClaimType::Supply, owner, reward, indexes);

        assert!(claim.validate().is_ok());
        assert!(claim.has_rewards());
        assert_eq!(claim.source_keys(), vec!["bnb".to_string()]);
        assert_eq!(claim.snapshot("bnb").and_then(|s| s.get("jinx")), Some(Dec::ONE));
    }
}
