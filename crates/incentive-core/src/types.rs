//! Shared identifier types and constants

use crate::error::{IncentiveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in a 365-day year, used for APY annualization
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Account address of a reward owner
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address {
    /// 20-byte account identifier
    bytes: [u8; 20],
}

impl Address {
    /// Create an address from raw bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.bytes
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let decoded = hex::decode(s).map_err(|e| IncentiveError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&decoded)
    }

    /// Build from a byte slice of exactly 20 bytes
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let bytes: [u8; 20] = raw.try_into().map_err(|_| {
            IncentiveError::InvalidAddress(format!("expected 20 bytes, got {}", raw.len()))
        })?;
        Ok(Self { bytes })
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
