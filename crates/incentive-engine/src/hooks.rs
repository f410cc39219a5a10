//! # Position Hooks
//!
//! What a source subsystem calls around its own state changes. One
//! [`PositionHooks`] is bound to one reward category.
//!
//! ```text
//!   deposit(owner, 100 bnb)
//!     ├─ before_position_modified(owner, [(bnb, old shares)])
//!     ├─ ... subsystem mutates the position ...
//!     └─ after_position_modified(owner, [bnb])
//! ```

use crate::keeper::Keeper;
use incentive_core::{Address, ClaimType, Dec, Result};
use incentive_storage::KvStore;

/// Synchronization entry points for one category
pub struct PositionHooks<'a, S: KvStore> {
    keeper: &'a Keeper<S>,
    claim_type: ClaimType,
}

impl<'a, S: KvStore> PositionHooks<'a, S> {
    pub fn new(keeper: &'a Keeper<S>, claim_type: ClaimType) -> Self {
        Self { keeper, claim_type }
    }

    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    /// A position was opened on `held_source_keys`
    pub fn after_position_created(&self, owner: &Address, held_source_keys: &[String]) -> Result<()> {
        self.keeper
            .initialize_reward(self.claim_type, owner, held_source_keys)
    }

    /// A position is about to change; `current_shares` are its sizes now
    pub fn before_position_modified(&self, owner: &Address, current_shares: &[(String, Dec)]) -> Result<()> {
        for (source_key, shares) in current_shares {
            self.keeper
                .synchronize_reward(self.claim_type, owner, source_key, *shares)?;
        }
        Ok(())
    }

    /// A position changed and now holds `held_source_keys`
    pub fn after_position_modified(&self, owner: &Address, held_source_keys: &[String]) -> Result<()> {
        self.keeper
            .update_index_denoms(self.claim_type, owner, held_source_keys)
    }
}

impl<S: KvStore> Keeper<S> {
    /// Hooks for a source subsystem of `claim_type`
    pub fn hooks(&self, claim_type: ClaimType) -> PositionHooks<'_, S> {
        PositionHooks::new(self, claim_type)
    }
}
