//! # Collaborator Capabilities
//!
//! Narrow interfaces to the subsystems the engine reads from and hands
//! payouts to. They are injected at construction, one [`SourceShares`] per
//! reward category plus an optional price feed and payout scheduler.
//!
//! | Capability        | Provided by                          | Used for              |
//! |-------------------|--------------------------------------|-----------------------|
//! | `SourceShares`    | lending, CDP, staking, AMM, vaults   | accrual, sync, APY    |
//! | `PriceFeed`       | price oracle                         | APY                   |
//! | `PayoutScheduler` | vesting module                       | claim payout          |

use incentive_core::{Address, ClaimType, Coins, Dec, IncentiveError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Normalized position sizes reported by a source subsystem.
///
/// Shares must be unaffected by passive interest accrual, e.g. principal
/// divided by the current interest factor.
pub trait SourceShares: Send + Sync {
    /// Total shares outstanding for a source key
    fn total_source_shares(&self, source_key: &str) -> Dec;

    /// Shares held by `owner`, `None` when the owner holds no position
    fn owner_source_shares(&self, owner: &Address, source_key: &str) -> Option<Dec>;
}

/// Current market prices
pub trait PriceFeed: Send + Sync {
    /// Price of one unit on `market_id`
    fn current_price(&self, market_id: &str) -> Result<Dec>;
}

/// Vesting and transfer of claimed rewards
pub trait PayoutScheduler: Send + Sync {
    /// Pay `coins` to `owner`, locked for `lockup_periods`
    fn schedule_payout(&self, owner: &Address, coins: &Coins, lockup_periods: u64) -> Result<()>;
}

/// Registry of injected capabilities
#[derive(Clone, Default)]
pub struct Collaborators {
    sources: HashMap<ClaimType, Arc<dyn SourceShares>>,
    price_feed: Option<Arc<dyn PriceFeed>>,
    payout_scheduler: Option<Arc<dyn PayoutScheduler>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the share source of a category
    pub fn with_source(mut self, claim_type: ClaimType, source: Arc<dyn SourceShares>) -> Self {
        self.sources.insert(claim_type, source);
        self
    }

    /// Register the price feed
    pub fn with_price_feed(mut self, feed: Arc<dyn PriceFeed>) -> Self {
        self.price_feed = Some(feed);
        self
    }

    /// Register the payout scheduler
    pub fn with_payout_scheduler(mut self, scheduler: Arc<dyn PayoutScheduler>) -> Self {
        self.payout_scheduler = Some(scheduler);
        self
    }

    /// Share source of a category
    pub fn source(&self, claim_type: ClaimType) -> Result<&dyn SourceShares> {
        self.sources
            .get(&claim_type)
            .map(|s| s.as_ref())
            .ok_or(IncentiveError::SourceNotRegistered(claim_type))
    }

    pub fn price_feed(&self) -> Result<&dyn PriceFeed> {
        self.price_feed
            .as_deref()
            .ok_or(IncentiveError::PriceFeedUnavailable)
    }

    pub fn payout_scheduler(&self) -> Result<&dyn PayoutScheduler> {
        self.payout_scheduler
            .as_deref()
            .ok_or_else(|| IncentiveError::PayoutFailed("no payout scheduler registered".to_string()))
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sources: Vec<ClaimType> = self.sources.keys().copied().collect();
        sources.sort();
        f.debug_struct("Collaborators")
            .field("sources", &sources)
            .field("price_feed", &self.price_feed.is_some())
            .field("payout_scheduler", &self.payout_scheduler.is_some())
            .finish()
    }
}
