//! # Keeper
//!
//! Owns the module's slice of the key-value store and the injected
//! collaborators. Every engine operation is a method on [`Keeper`]; this
//! file holds construction, parameter management and the typed record
//! accessors the other operations build on.
//!
//! Records that fail to decode mean the store is corrupted; reading one
//! panics rather than returning a partial view.

use crate::collaborators::Collaborators;
use crate::config::{ApyConfig, EngineConfig};
use crate::keys;
use chrono::{DateTime, Utc};
use incentive_core::{
    Address, Claim, ClaimType, IncentiveError, MultiRewardIndex, MultiRewardIndexes, Params, Result,
    RewardIndexes, RewardPeriod,
};
use incentive_storage::{decode, encode, KvStore, PrefixStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Previous accrual time of one source key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulationTime {
    /// Source key
    pub source_key: String,

    /// Time the source key's indexes were last advanced to
    pub previous_accumulation_time: DateTime<Utc>,
}

/// Reward engine bound to a store
pub struct Keeper<S: KvStore> {
    store: S,
    collaborators: Collaborators,
    apy: ApyConfig,
}

impl<S: KvStore> Keeper<S> {
    /// Create a keeper over `store`
    pub fn new(store: S, collaborators: Collaborators) -> Self {
        Self {
            store,
            collaborators,
            apy: ApyConfig::default(),
        }
    }

    /// Create a keeper and store the configured parameters
    pub fn from_config(store: S, collaborators: Collaborators, config: &EngineConfig) -> Result<Self> {
        let keeper = Self::new(store, collaborators).with_apy_config(config.apy.clone());
        keeper.set_params(config.params.clone())?;
        Ok(keeper)
    }

    /// Replace the APY market configuration
    pub fn with_apy_config(mut self, apy: ApyConfig) -> Self {
        self.apy = apy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn apy_config(&self) -> &ApyConfig {
        &self.apy
    }

    // === Parameters ===

    /// Stored parameters, defaults when none were set
    pub fn get_params(&self) -> Params {
        self.read(&self.store, keys::PARAMS_KEY).unwrap_or_default()
    }

    /// Validate and store parameters
    pub fn set_params(&self, params: Params) -> Result<()> {
        params.validate()?;
        self.store.set(keys::PARAMS_KEY, encode(&params)?);
        info!(
            claim_end = %params.claim_end,
            multiplier_denoms = params.claim_multipliers.len(),
            "Incentive parameters updated"
        );
        Ok(())
    }

    /// Configured reward period of a category for a source key
    pub fn get_reward_period(&self, claim_type: ClaimType, source_key: &str) -> Option<RewardPeriod> {
        self.get_params().reward_period(claim_type, source_key).cloned()
    }

    // === Claims ===

    /// Stored claim of an owner
    pub fn get_claim(&self, claim_type: ClaimType, owner: &Address) -> Option<Claim> {
        self.read(&self.claims(claim_type), owner.as_bytes())
    }

    pub fn set_claim(&self, claim: &Claim) -> Result<()> {
        self.claims(claim.claim_type)
            .set(claim.owner.as_bytes(), encode(claim)?);
        Ok(())
    }

    /// Delete an owner's claim; refused while it still holds rewards
    pub fn delete_claim(&self, claim_type: ClaimType, owner: &Address) -> Result<()> {
        let claim = self
            .get_claim(claim_type, owner)
            .ok_or(IncentiveError::ClaimNotFound {
                claim_type,
                owner: *owner,
            })?;
        if claim.has_rewards() {
            return Err(IncentiveError::ClaimHasRewards(*owner));
        }
        self.claims(claim_type).delete(owner.as_bytes());
        debug!(%claim_type, %owner, "Claim deleted");
        Ok(())
    }

    /// All claims of a category in owner byte order
    pub fn get_claims(&self, claim_type: ClaimType) -> Vec<Claim> {
        self.read_all(&self.claims(claim_type))
    }

    /// One page of claims; pages start at 1
    pub fn get_claims_page(&self, claim_type: ClaimType, page: usize, limit: usize) -> Result<Vec<Claim>> {
        if page == 0 || limit == 0 {
            return Err(IncentiveError::InvalidParams(format!(
                "page {} and limit {} must both be positive",
                page, limit
            )));
        }
        let skip = (page - 1).saturating_mul(limit);
        Ok(self
            .claims(claim_type)
            .iterate_prefix(&[])
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(key, bytes)| self.decode_record(&key, &bytes))
            .collect())
    }

    // === Global Reward Indexes ===

    /// Global indexes of a source key, `None` when it was never rewarded
    pub fn get_reward_indexes(&self, claim_type: ClaimType, source_key: &str) -> Option<RewardIndexes> {
        self.read(&self.reward_indexes(claim_type), source_key.as_bytes())
    }

    pub fn set_reward_indexes(
        &self,
        claim_type: ClaimType,
        source_key: &str,
        indexes: &RewardIndexes,
    ) -> Result<()> {
        self.reward_indexes(claim_type)
            .set(source_key.as_bytes(), encode(indexes)?);
        Ok(())
    }

    /// Every global index of a category
    pub fn get_reward_factors(&self, claim_type: ClaimType) -> MultiRewardIndexes {
        self.reward_indexes(claim_type)
            .iterate_prefix(&[])
            .into_iter()
            .map(|(key, bytes)| {
                MultiRewardIndex::new(source_key_of(&key), self.decode_record(&key, &bytes))
            })
            .collect()
    }

    // === Accrual Times ===

    /// Time a source key was last accrued to, `None` before the first accrual
    pub fn get_previous_accrual_time(
        &self,
        claim_type: ClaimType,
        source_key: &str,
    ) -> Option<DateTime<Utc>> {
        self.read(&self.accrual_times(claim_type), source_key.as_bytes())
    }

    pub fn set_previous_accrual_time(
        &self,
        claim_type: ClaimType,
        source_key: &str,
        time: DateTime<Utc>,
    ) -> Result<()> {
        self.accrual_times(claim_type)
            .set(source_key.as_bytes(), encode(&time)?);
        Ok(())
    }

    /// Every accrual time of a category
    pub fn get_accrual_times(&self, claim_type: ClaimType) -> Vec<AccumulationTime> {
        self.accrual_times(claim_type)
            .iterate_prefix(&[])
            .into_iter()
            .map(|(key, bytes)| AccumulationTime {
                source_key: source_key_of(&key),
                previous_accumulation_time: self.decode_record(&key, &bytes),
            })
            .collect()
    }

    // === Store Views ===

    fn claims(&self, claim_type: ClaimType) -> PrefixStore<&S> {
        PrefixStore::new(&self.store, keys::claim_prefix(claim_type))
    }

    fn reward_indexes(&self, claim_type: ClaimType) -> PrefixStore<&S> {
        PrefixStore::new(&self.store, keys::reward_index_prefix(claim_type))
    }

    fn accrual_times(&self, claim_type: ClaimType) -> PrefixStore<&S> {
        PrefixStore::new(&self.store, keys::accrual_time_prefix(claim_type))
    }

    fn read<T: DeserializeOwned>(&self, view: &impl KvStore, key: &[u8]) -> Option<T> {
        view.get(key).map(|bytes| self.decode_record(key, &bytes))
    }

    fn read_all<T: DeserializeOwned>(&self, view: &impl KvStore) -> Vec<T> {
        view.iterate_prefix(&[])
            .into_iter()
            .map(|(key, bytes)| self.decode_record(&key, &bytes))
            .collect()
    }

    fn decode_record<T: DeserializeOwned>(&self, key: &[u8], bytes: &[u8]) -> T {
        match decode(bytes) {
            Ok(value) => value,
            Err(e) => panic!("corrupted incentive record at key {:?}: {}", key, e),
        }
    }
}

fn source_key_of(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
