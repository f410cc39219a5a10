//! # Incentive Core
//!
//! Value types shared by the incentive storage layer and engine.
//!
//! This crate provides the fundamental building blocks:
//! - `Dec` - Deterministic 18-digit fixed-point decimal
//! - `Coins` - Ordered token amounts keyed by denom
//! - `RewardIndexes` / `MultiRewardIndexes` - Cumulative reward-per-share factors
//! - `Claim` - An owner's unclaimed rewards and index snapshots in one category
//! - `Params` - Reward periods, payout multipliers and the claim deadline
//!
//! ## Reward Model
//!
//! ```text
//!   rewards_per_second ──► global index ──► owner snapshot ──► claim reward
//!        (params)          (accumulate)      (synchronize)        (payout)
//!
//!   reward = (global factor - snapshot factor) x owner shares
//! ```

pub mod claim;
pub mod coins;
pub mod decimal;
pub mod error;
pub mod index;
pub mod params;
pub mod types;

pub use claim::*;
pub use coins::*;
pub use decimal::*;
pub use error::*;
pub use index::*;
pub use params::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::claim::{Claim, ClaimType};
    pub use crate::coins::{Coin, Coins};
    pub use crate::decimal::Dec;
    pub use crate::error::{IncentiveError, Result};
    pub use crate::index::{MultiRewardIndexes, RewardIndexes};
    pub use crate::params::{Multiplier, MultipliersPerDenom, Params, RewardPeriod, RewardPeriods};
    pub use crate::types::*;
}
