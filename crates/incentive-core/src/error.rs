//! Error types for incentive operations

use crate::claim::ClaimType;
use crate::decimal::Dec;
use crate::types::Address;
use thiserror::Error;

/// Result type alias for incentive operations
pub type Result<T> = std::result::Result<T, IncentiveError>;

/// Errors that can occur while accruing, synchronizing or paying out rewards
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncentiveError {
    // === Value Errors ===
    /// Decimal text could not be parsed or is out of range
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    /// Denom does not satisfy the denom format
    #[error("Invalid denom: {0}")]
    InvalidDenom(String),

    /// Coin set is malformed
    #[error("Invalid coins: {0}")]
    InvalidCoins(String),

    /// Address could not be decoded
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Arithmetic overflow while computing rewards
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    // === Parameter Errors ===
    /// Reward period failed validation
    #[error("Invalid reward period: {0}")]
    InvalidRewardPeriod(String),

    /// Two reward periods of one category share a source key
    #[error("Duplicated reward period for {claim_type} source key {source_key}")]
    DuplicatedRewardPeriod {
        claim_type: ClaimType,
        source_key: String,
    },

    /// Multiplier failed validation
    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(String),

    /// Parameter set failed validation
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    // === Lookup Errors ===
    /// No claim stored for the owner in the category
    #[error("No {claim_type} claim found for {owner}")]
    ClaimNotFound { claim_type: ClaimType, owner: Address },

    /// No reward period configured for the source key
    #[error("No {claim_type} reward period found for source key {source_key}")]
    RewardPeriodNotFound {
        claim_type: ClaimType,
        source_key: String,
    },

    // === Claim Errors ===
    /// Claim selection names a multiplier that does not exist for the denom
    #[error("Invalid multiplier selection: denom {denom} has no multiplier named {multiplier}")]
    InvalidMultiplierSelection { denom: String, multiplier: String },

    /// Claim submitted after the claim end time
    #[error("Claim period expired at {claim_end}")]
    ClaimExpired { claim_end: String },

    /// Category accumulates rewards but does not pay them out
    #[error("{0} claims are disabled")]
    ClaimsDisabled(ClaimType),

    /// Claim would pay out nothing
    #[error("Cannot claim: no rewards payable for the selected denoms")]
    ZeroClaim,

    /// Claim still holds unclaimed reward and cannot be removed
    #[error("Claim for {0} still holds unclaimed rewards")]
    ClaimHasRewards(Address),

    // === Invariant Violations ===
    /// A global reward factor is lower than a claim's snapshot of it
    #[error("Reward factor decreased for {denom}: old {old}, new {new}")]
    DecreasingRewardFactor { denom: String, old: Dec, new: Dec },

    /// A reward denom tracked by a claim vanished from the global index
    #[error("Global reward index missing denom {0} referenced by a claim")]
    MissingRewardIndex(String),

    // === Collaborator Errors ===
    /// No share source injected for the category
    #[error("No source share provider registered for {0}")]
    SourceNotRegistered(ClaimType),

    /// No price feed injected
    #[error("Price feed unavailable")]
    PriceFeedUnavailable,

    /// Price lookup failed
    #[error("Failed to get price for market {market_id}: {reason}")]
    PriceUnavailable { market_id: String, reason: String },

    /// Payout scheduling failed
    #[error("Payout failed: {0}")]
    PayoutFailed(String),

    // === Storage Errors ===
    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // === Configuration Errors ===
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error codes for query and transaction responses
impl IncentiveError {
    /// Get the error code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::ClaimNotFound { .. } => 2001,
            Self::RewardPeriodNotFound { .. } => 2002,
            Self::InvalidMultiplierSelection { .. } => 2003,
            Self::ClaimExpired { .. } => 2004,
            Self::ClaimsDisabled(_) => 2005,
            Self::ZeroClaim => 2006,
            Self::DecreasingRewardFactor { .. } | Self::MissingRewardIndex(_) => 2007,
            Self::InvalidRewardPeriod(_)
            | Self::DuplicatedRewardPeriod { .. }
            | Self::InvalidMultiplier(_)
            | Self::InvalidParams(_) => 2008,
            Self::PriceUnavailable { .. } | Self::PriceFeedUnavailable => 2009,
            _ => 9999,
        }
    }

    /// Check if error is an ordinary control-flow outcome rather than corrupted state
    pub fn is_recoverable(&self) -> bool {
        !self.is_invariant_violation()
    }

    /// Check if error signals corrupted state that must abort the enclosing operation
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::DecreasingRewardFactor { .. } | Self::MissingRewardIndex(_)
        )
    }
}
