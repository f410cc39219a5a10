//! # Claim Synchronization
//!
//! Source subsystems drive three operations around every position change:
//!
//! ```text
//!   first exposure        before mutation          after mutation
//!   ───────────────       ────────────────         ─────────────────────
//!   initialize_reward ──► synchronize_reward ──►   update_index_denoms
//!   snapshot = global     reward += delta x shares  add/remove snapshots
//! ```
//!
//! Settling always happens against the position size held *before* the
//! mutation, so the interval since the last sync is charged to the shares
//! that actually earned it.
//!
//! A source key missing from the global indexes has never been rewarded and
//! is skipped. A reward denom missing from a claim's snapshot starts from a
//! factor of zero.

use crate::keeper::Keeper;
use incentive_core::{
    set_difference, Address, Claim, ClaimType, Coin, Coins, Dec, IncentiveError, Result,
    RewardIndexes,
};
use incentive_storage::KvStore;
use tracing::debug;

/// Reward earned by `shares` while one denom's factor moved from `old` to `new`.
///
/// The product is rounded half-up to a whole amount.
pub fn calculate_single_reward(denom: &str, old: Dec, new: Dec, shares: Dec) -> Result<u128> {
    let delta = new
        .checked_sub(old)
        .ok_or_else(|| IncentiveError::DecreasingRewardFactor {
            denom: denom.to_string(),
            old,
            new,
        })?;
    delta
        .mul_round_to_int(shares)
        .ok_or_else(|| IncentiveError::Overflow(format!("reward of {} x {} for {}", delta, shares, denom)))
}

/// Rewards earned between a claim snapshot and the current global indexes
pub fn calculate_rewards(snapshot: &RewardIndexes, global: &RewardIndexes, shares: Dec) -> Result<Coins> {
    if let Some(missing) = snapshot.denoms().into_iter().find(|d| global.get(d).is_none()) {
        return Err(IncentiveError::MissingRewardIndex(missing));
    }

    let mut earned = Coins::new();
    for index in global.iter() {
        let old = snapshot.get(&index.denom).unwrap_or(Dec::ZERO);
        let amount = calculate_single_reward(&index.denom, old, index.factor, shares)?;
        earned = earned.add_coin(&Coin::new(index.denom.clone(), amount))?;
    }
    Ok(earned)
}

/// Settle one source key of a claim without touching the store.
///
/// `global` is `None` when the source key was never rewarded, in which case
/// the claim is returned unchanged.
pub fn synchronize_source(
    claim: &Claim,
    source_key: &str,
    global: Option<&RewardIndexes>,
    shares: Dec,
) -> Result<Claim> {
    let Some(global) = global else {
        return Ok(claim.clone());
    };

    let snapshot = claim.snapshot(source_key).cloned().unwrap_or_default();
    let earned = calculate_rewards(&snapshot, global, shares)?;

    let mut synced = claim.clone();
    synced.reward = synced.reward.add(&earned)?;
    synced.reward_indexes = synced.reward_indexes.with(source_key, global.clone());
    Ok(synced)
}

impl<S: KvStore> Keeper<S> {
    /// Snapshot the current global indexes for source keys the claim does not
    /// track yet. Existing snapshots are left alone.
    pub fn initialize_reward(
        &self,
        claim_type: ClaimType,
        owner: &Address,
        source_keys: &[String],
    ) -> Result<()> {
        let mut claim = self
            .get_claim(claim_type, owner)
            .unwrap_or_else(|| Claim::empty(claim_type, *owner));

        for source_key in source_keys {
            if claim.reward_indexes.contains(source_key) {
                continue;
            }
            let global = self
                .get_reward_indexes(claim_type, source_key)
                .unwrap_or_default();
            claim.reward_indexes = claim.reward_indexes.with(source_key, global);
        }

        debug!(%claim_type, %owner, keys = source_keys.len(), "Initialized reward snapshots");
        self.set_claim(&claim)
    }

    /// Settle rewards of one source key for `shares`, the size of the owner's
    /// position before the pending mutation. A missing claim is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the global indexes regressed below the claim's snapshot.
    pub fn synchronize_reward(
        &self,
        claim_type: ClaimType,
        owner: &Address,
        source_key: &str,
        shares: Dec,
    ) -> Result<()> {
        let Some(claim) = self.get_claim(claim_type, owner) else {
            return Ok(());
        };

        let global = self.get_reward_indexes(claim_type, source_key);
        let synced = self.settle(&claim, source_key, global.as_ref(), shares)?;

        debug!(
            %claim_type,
            %owner,
            source_key,
            shares = %shares,
            reward = %synced.reward,
            "Synchronized reward"
        );
        self.set_claim(&synced)
    }

    /// Settle every source key the owner's claim tracks, using the shares the
    /// source subsystem currently reports.
    pub fn synchronize_claim(&self, claim_type: ClaimType, owner: &Address) -> Result<()> {
        let Some(claim) = self.get_claim(claim_type, owner) else {
            return Ok(());
        };
        let synced = self.simulate_synchronization(&claim)?;
        self.set_claim(&synced)
    }

    /// Reconcile the claim's tracked source keys with the keys the owner holds.
    ///
    /// New keys are snapshotted at the current global indexes, keys no longer
    /// held are dropped, and keys in both sets are left untouched. An owner
    /// without a claim who holds nothing gets no claim.
    pub fn update_index_denoms(
        &self,
        claim_type: ClaimType,
        owner: &Address,
        held_source_keys: &[String],
    ) -> Result<()> {
        let stored = self.get_claim(claim_type, owner);
        if stored.is_none() && held_source_keys.is_empty() {
            return Ok(());
        }
        let mut claim = stored.unwrap_or_else(|| Claim::empty(claim_type, *owner));

        let tracked = claim.source_keys();
        let to_add = set_difference(held_source_keys, &tracked);
        let to_remove = set_difference(&tracked, held_source_keys);

        for source_key in &to_add {
            let global = self
                .get_reward_indexes(claim_type, source_key)
                .unwrap_or_default();
            claim.reward_indexes = claim.reward_indexes.with(source_key, global);
        }
        for source_key in &to_remove {
            claim.reward_indexes = claim.reward_indexes.remove_entry(source_key);
        }

        debug!(
            %claim_type,
            %owner,
            added = ?to_add,
            removed = ?to_remove,
            "Updated tracked source keys"
        );
        self.set_claim(&claim)
    }

    /// The claim as it would be after synchronizing every tracked source key
    /// now. Nothing is written.
    ///
    /// Source keys where the owner no longer holds a position are skipped.
    pub fn simulate_synchronization(&self, claim: &Claim) -> Result<Claim> {
        let source = self.collaborators().source(claim.claim_type)?;

        let mut synced = claim.clone();
        for source_key in claim.source_keys() {
            let Some(shares) = source.owner_source_shares(&claim.owner, &source_key) else {
                continue;
            };
            let global = self.get_reward_indexes(claim.claim_type, &source_key);
            synced = self.settle(&synced, &source_key, global.as_ref(), shares)?;
        }
        Ok(synced)
    }

    /// Stored claim with pending rewards applied
    pub fn get_synced_claim(&self, claim_type: ClaimType, owner: &Address) -> Result<Option<Claim>> {
        self.get_claim(claim_type, owner)
            .map(|claim| self.simulate_synchronization(&claim))
            .transpose()
    }

    fn settle(
        &self,
        claim: &Claim,
        source_key: &str,
        global: Option<&RewardIndexes>,
        shares: Dec,
    ) -> Result<Claim> {
        synchronize_source(claim, source_key, global, shares).map_err(|e| {
            if e.is_invariant_violation() {
                panic!(
                    "corrupted global reward indexes for {} source key {} (owner {}): {}",
                    claim.claim_type, source_key, claim.owner, e
                );
            }
            e
        })
    }
}
