//! # Claim Payout
//!
//! Turns an owner's synchronized claim into payable coins. For every
//! selected reward denom the claimant names a multiplier:
//!
//! ```text
//!   payable  = round_half_up(unclaimed x payout_factor)
//!   forfeit  = unclaimed - payable
//!   unclaimed <- 0
//! ```
//!
//! Payable coins are handed to the payout scheduler with the multiplier's
//! lockup. Every selection is checked before anything is paid or written.

use crate::keeper::Keeper;
use chrono::{DateTime, Utc};
use incentive_core::{
    validate_denom, Address, ClaimType, Coin, Coins, Dec, IncentiveError, Multiplier,
    Result,
};
use incentive_storage::KvStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Multiplier chosen for one reward denom
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Reward denom to claim
    pub denom: String,

    /// Name of the multiplier to apply
    pub multiplier_name: String,
}

impl Selection {
    pub fn new(denom: impl Into<String>, multiplier_name: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            multiplier_name: multiplier_name.into(),
        }
    }
}

/// Selections of one claim, at most one per denom
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(Vec<Selection>);

impl Selections {
    pub fn new(selections: Vec<Selection>) -> Self {
        Self(selections)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.0.iter()
    }

    /// Check the selections are non-empty, well formed and name each denom once
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(IncentiveError::InvalidParams(
                "claim must select at least one denom".to_string(),
            ));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.0.len());
        for selection in &self.0 {
            validate_denom(&selection.denom)?;
            if selection.multiplier_name.is_empty() {
                return Err(IncentiveError::InvalidMultiplierSelection {
                    denom: selection.denom.clone(),
                    multiplier: String::new(),
                });
            }
            if seen.contains(&selection.denom.as_str()) {
                return Err(IncentiveError::InvalidParams(format!(
                    "denom {} selected more than once",
                    selection.denom
                )));
            }
            seen.push(selection.denom.as_str());
        }
        Ok(())
    }
}

impl FromIterator<Selection> for Selections {
    fn from_iter<I: IntoIterator<Item = Selection>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Amount paid now for `unclaimed` under `payout_factor`
pub fn payable_amount(unclaimed: u128, payout_factor: Dec) -> Result<u128> {
    Dec::from_int(unclaimed)
        .mul_round_to_int(payout_factor)
        .ok_or_else(|| IncentiveError::Overflow(format!("payout of {} x {}", unclaimed, payout_factor)))
}

impl<S: KvStore> Keeper<S> {
    /// Pay out the selected denoms of an owner's claim.
    ///
    /// Returns the coins handed to the payout scheduler.
    pub fn claim_reward(
        &self,
        owner: &Address,
        claim_type: ClaimType,
        selections: &Selections,
        block_time: DateTime<Utc>,
    ) -> Result<Coins> {
        if !claim_type.is_claimable() {
            warn!(%claim_type, %owner, "Refused claim on disabled category");
            return Err(IncentiveError::ClaimsDisabled(claim_type));
        }
        selections.validate()?;

        let params = self.get_params();
        let chosen: Vec<(&str, &Multiplier)> = selections
            .iter()
            .map(|s| {
                params
                    .multiplier(&s.denom, &s.multiplier_name)
                    .map(|m| (s.denom.as_str(), m))
                    .ok_or_else(|| IncentiveError::InvalidMultiplierSelection {
                        denom: s.denom.clone(),
                        multiplier: s.multiplier_name.clone(),
                    })
            })
            .collect::<Result<_>>()
            .map_err(|e| {
                warn!(%claim_type, %owner, error = %e, "Refused claim");
                e
            })?;

        if block_time > params.claim_end {
            warn!(%claim_type, %owner, claim_end = %params.claim_end, "Refused expired claim");
            return Err(IncentiveError::ClaimExpired {
                claim_end: params.claim_end.to_rfc3339(),
            });
        }

        let scheduler = self.collaborators().payout_scheduler()?;
        let claim = self
            .get_claim(claim_type, owner)
            .ok_or(IncentiveError::ClaimNotFound {
                claim_type,
                owner: *owner,
            })?;
        let mut synced = self.simulate_synchronization(&claim)?;

        let mut claiming = Coins::new();
        let mut payouts: Vec<(Coin, u64)> = Vec::with_capacity(chosen.len());
        for (denom, multiplier) in &chosen {
            let unclaimed = synced.reward.amount_of(denom);
            claiming = claiming.add_coin(&Coin::new(*denom, unclaimed))?;

            let payable = payable_amount(unclaimed, multiplier.payout_factor)?;
            if payable > 0 {
                payouts.push((Coin::new(*denom, payable), multiplier.lockup_periods));
            }
        }
        if payouts.is_empty() {
            warn!(%claim_type, %owner, "Refused claim with nothing payable");
            return Err(IncentiveError::ZeroClaim);
        }

        let mut paid = Coins::new();
        for (coin, lockup_periods) in &payouts {
            let coins = Coins::new().add_coin(coin)?;
            scheduler.schedule_payout(owner, &coins, *lockup_periods)?;
            paid = paid.add_coin(coin)?;
        }

        synced.reward = synced.reward.checked_sub(&claiming).ok_or_else(|| {
            IncentiveError::Overflow(format!("claiming {} from {}", claiming, synced.reward))
        })?;
        self.set_claim(&synced)?;

        info!(%claim_type, %owner, paid = %paid, "Claimed rewards");
        Ok(paid)
    }
}
