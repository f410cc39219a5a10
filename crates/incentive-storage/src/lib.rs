//! # Incentive Storage
//!
//! Key-value storage boundary for the incentive module.
//!
//! ## Storage Layout
//!
//! - `kv` - The [`KvStore`] trait every backend implements
//! - `mem_db` - In-memory ordered store
//! - `cache_db` - Write buffer giving a transaction all-or-nothing semantics
//! - `prefix_db` - Namespaced view over a parent store
//! - `codec` - bincode encoding of stored values
//!
//! ```text
//!   Keeper ──► PrefixStore(0x01) ──► CacheStore ──► MemStore
//!                                       │
//!                          commit() ────┘  discard() drops writes
//! ```

pub mod cache_db;
pub mod codec;
pub mod kv;
pub mod mem_db;
pub mod prefix_db;

// Re-export for convenience
pub use cache_db::CacheStore;
pub use codec::{decode, encode};
pub use kv::KvStore;
pub use mem_db::MemStore;
pub use prefix_db::PrefixStore;
