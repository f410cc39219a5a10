//! # Incentive Engine
//!
//! Reward accumulation and claim synchronization for the incentive module.
//!
//! ## Key Features
//!
//! - **Lazy settlement**: Global indexes advance once per block; an owner's
//!   claim is settled only when their position changes or they claim
//! - **Uniform categories**: Minting, supply, borrow, delegator, swap,
//!   savings and earn share one code path keyed by [`ClaimType`]
//! - **Injected collaborators**: Share sources, price feed and payout
//!   scheduler are traits supplied at construction
//!
//! ## Block Lifecycle
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  begin_blocker(t)      accumulate every reward period to t       │
//! │        │                                                         │
//! │        ▼                                                         │
//! │  transactions          hooks: initialize / synchronize / update  │
//! │        │               claim_reward: sync, apply multiplier, pay │
//! │        ▼                                                         │
//! │  queries               get_synced_claim, get_apy, reward factors │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ClaimType`]: incentive_core::ClaimType

pub mod abci;
pub mod accumulator;
pub mod apy;
pub mod collaborators;
pub mod config;
pub mod hooks;
pub mod keeper;
pub mod keys;
pub mod payout;
pub mod sync;
pub mod telemetry;

// Re-exports
pub use accumulator::Accumulator;
pub use apy::Apy;
pub use collaborators::{Collaborators, PayoutScheduler, PriceFeed, SourceShares};
pub use config::{ApyConfig, EngineConfig, LoggingConfig};
pub use hooks::PositionHooks;
pub use keeper::{AccumulationTime, Keeper};
pub use payout::{Selection, Selections};
pub use sync::{calculate_rewards, calculate_single_reward, synchronize_source};
pub use telemetry::init_logging;
