//! Fake collaborators and fixtures shared by the engine integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use incentive_core::{
    Address, ClaimType, Coin, Coins, Dec, IncentiveError, Multiplier, MultipliersPerDenom, Params,
    Result, RewardPeriod, RewardPeriods,
};
use incentive_engine::{Collaborators, Keeper, PayoutScheduler, PriceFeed, SourceShares};
use incentive_storage::{KvStore, MemStore};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Genesis of the test chain
pub const GENESIS: i64 = 1_640_995_200; // 2022-01-01T00:00:00Z

pub const DAY: i64 = 86_400;

pub fn time(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(GENESIS + offset_secs, 0)
        .single()
        .expect("valid timestamp")
}

pub fn dec(s: &str) -> Dec {
    s.parse().expect("valid decimal")
}

pub fn shares(amount: u128) -> Dec {
    Dec::from_int(amount)
}

pub fn coins(amounts: &[(&str, u128)]) -> Coins {
    Coins::from_coins(amounts.iter().map(|(d, a)| Coin::new(*d, *a))).expect("valid coins")
}

pub fn owner(n: u8) -> Address {
    Address::new([n; 20])
}

pub fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Position book of one source subsystem
#[derive(Default)]
pub struct ShareBook {
    positions: RwLock<BTreeMap<(String, Address), Dec>>,
}

impl ShareBook {
    pub fn set(&self, owner: &Address, source_key: &str, amount: Dec) {
        self.positions
            .write()
            .insert((source_key.to_string(), *owner), amount);
    }

    pub fn remove(&self, owner: &Address, source_key: &str) {
        self.positions
            .write()
            .remove(&(source_key.to_string(), *owner));
    }

    /// Source keys an owner holds a position in
    pub fn held_keys(&self, owner: &Address) -> Vec<String> {
        self.positions
            .read()
            .keys()
            .filter(|(_, holder)| holder == owner)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl SourceShares for ShareBook {
    fn total_source_shares(&self, source_key: &str) -> Dec {
        self.positions
            .read()
            .iter()
            .filter(|((key, _), _)| key == source_key)
            .fold(Dec::ZERO, |acc, (_, amount)| {
                acc.checked_add(*amount).expect("total shares fit")
            })
    }

    fn owner_source_shares(&self, owner: &Address, source_key: &str) -> Option<Dec> {
        self.positions
            .read()
            .get(&(source_key.to_string(), *owner))
            .copied()
    }
}

/// Fixed price table keyed by market id
#[derive(Default)]
pub struct PriceTable {
    prices: RwLock<HashMap<String, Dec>>,
    lookups: RwLock<Vec<String>>,
}

impl PriceTable {
    pub fn set(&self, market_id: &str, price: Dec) {
        self.prices.write().insert(market_id.to_string(), price);
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.read().clone()
    }
}

impl PriceFeed for PriceTable {
    fn current_price(&self, market_id: &str) -> Result<Dec> {
        self.lookups.write().push(market_id.to_string());
        self.prices
            .read()
            .get(market_id)
            .copied()
            .ok_or_else(|| IncentiveError::PriceUnavailable {
                market_id: market_id.to_string(),
                reason: "no price posted".to_string(),
            })
    }
}

/// Payout scheduler that records every call
#[derive(Default)]
pub struct RecordingPayouts {
    payouts: RwLock<Vec<(Address, Coins, u64)>>,
    failing: RwLock<bool>,
}

impl RecordingPayouts {
    pub fn payouts(&self) -> Vec<(Address, Coins, u64)> {
        self.payouts.read().clone()
    }

    pub fn fail_next(&self) {
        *self.failing.write() = true;
    }
}

impl PayoutScheduler for RecordingPayouts {
    fn schedule_payout(&self, owner: &Address, coins: &Coins, lockup_periods: u64) -> Result<()> {
        if std::mem::take(&mut *self.failing.write()) {
            return Err(IncentiveError::PayoutFailed("module account empty".to_string()));
        }
        self.payouts
            .write()
            .push((*owner, coins.clone(), lockup_periods));
        Ok(())
    }
}

/// Standard multipliers offered for `jinx` and `ufury`
pub fn multipliers() -> Vec<MultipliersPerDenom> {
    let tiers = vec![
        Multiplier::new("small", 1, dec("0.2")),
        Multiplier::new("medium", 6, dec("0.5")),
        Multiplier::new("large", 12, Dec::ONE),
    ];
    vec![
        MultipliersPerDenom::new("jinx", tiers.clone()),
        MultipliersPerDenom::new("ufury", tiers),
    ]
}

/// Reward period running for a year from genesis
pub fn period(source_key: &str, rewards: Coins) -> RewardPeriod {
    RewardPeriod::new(source_key, time(0), time(365 * DAY), rewards)
}

/// Parameters with the given periods in one category
pub fn params_with(claim_type: ClaimType, periods: Vec<RewardPeriod>) -> Params {
    let mut params = Params {
        claim_multipliers: multipliers(),
        claim_end: time(2 * 365 * DAY),
        ..Params::default()
    };
    *params.reward_periods_mut(claim_type) = RewardPeriods::new(periods);
    params
}

/// Engine wired to fakes for every category
pub struct Harness {
    pub keeper: Keeper<Arc<MemStore>>,
    pub store: Arc<MemStore>,
    pub books: HashMap<ClaimType, Arc<ShareBook>>,
    pub prices: Arc<PriceTable>,
    pub payouts: Arc<RecordingPayouts>,
}

impl Harness {
    pub fn new(params: Params) -> Self {
        let store = Arc::new(MemStore::new());
        let (collaborators, books, prices, payouts) = Self::collaborators();
        let keeper = Keeper::new(Arc::clone(&store), collaborators);
        keeper.set_params(params).expect("valid params");

        Self {
            keeper,
            store,
            books,
            prices,
            payouts,
        }
    }

    /// Fresh collaborators with one share book per category
    pub fn collaborators() -> (
        Collaborators,
        HashMap<ClaimType, Arc<ShareBook>>,
        Arc<PriceTable>,
        Arc<RecordingPayouts>,
    ) {
        let prices = Arc::new(PriceTable::default());
        let payouts = Arc::new(RecordingPayouts::default());
        let mut books = HashMap::new();
        let mut collaborators = Collaborators::new()
            .with_price_feed(prices.clone())
            .with_payout_scheduler(payouts.clone());

        for claim_type in ClaimType::ALL {
            let book = Arc::new(ShareBook::default());
            collaborators = collaborators.with_source(claim_type, book.clone());
            books.insert(claim_type, book);
        }
        (collaborators, books, prices, payouts)
    }

    pub fn book(&self, claim_type: ClaimType) -> &ShareBook {
        self.books
            .get(&claim_type)
            .map(|b| b.as_ref())
            .expect("book registered")
    }

    /// Open a position the way a source subsystem would
    pub fn open(&self, claim_type: ClaimType, owner: &Address, source_key: &str, amount: Dec) {
        self.book(claim_type).set(owner, source_key, amount);
        self.keeper
            .hooks(claim_type)
            .after_position_created(owner, &keys(&[source_key]))
            .expect("initialize");
    }

    /// Resize a position: settle at the old size, mutate, reconcile keys
    pub fn resize(&self, claim_type: ClaimType, owner: &Address, source_key: &str, amount: Dec) {
        let book = self.book(claim_type);
        let held = book.owner_source_shares(owner, source_key).unwrap_or(Dec::ZERO);
        let hooks = self.keeper.hooks(claim_type);

        hooks
            .before_position_modified(owner, &[(source_key.to_string(), held)])
            .expect("synchronize");
        if amount.is_zero() {
            book.remove(owner, source_key);
        } else {
            book.set(owner, source_key, amount);
        }
        hooks
            .after_position_modified(owner, &book.held_keys(owner))
            .expect("update");
    }

    pub fn begin_block(&self, offset_secs: i64) {
        self.keeper
            .begin_blocker(time(offset_secs))
            .expect("begin blocker");
    }

    pub fn reward_of(&self, claim_type: ClaimType, owner: &Address, denom: &str) -> u128 {
        self.keeper
            .get_claim(claim_type, owner)
            .map(|c| c.reward.amount_of(denom))
            .unwrap_or(0)
    }

    pub fn raw_entries(&self) -> usize {
        self.store.iterate_prefix(&[]).len()
    }
}
