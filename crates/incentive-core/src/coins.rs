//! Token amounts
//!
//! [`Coins`] is an ordered set keyed by denom. Arithmetic never leaves a zero
//! entry behind, so `amount_of` on a fully claimed denom simply reports 0.

use crate::error::{IncentiveError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Check a denom against the denom format: 3-128 characters, leading
/// ASCII letter, then alphanumerics or `/ : . _ -`.
pub fn validate_denom(denom: &str) -> Result<()> {
    let invalid = || IncentiveError::InvalidDenom(denom.to_string());

    if denom.len() < 3 || denom.len() > 128 {
        return Err(invalid());
    }
    let mut chars = denom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(invalid()),
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Amounts are encoded as decimal strings
mod amount_string {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u128, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A single token amount
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Token denomination
    pub denom: String,
    /// Amount in the denom's smallest unit
    #[serde(with = "amount_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Ordered set of non-zero coin amounts, one entry per denom
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coins {
    amounts: BTreeMap<String, u128>,
}

impl Coins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from coins, merging repeated denoms and dropping zeros
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self> {
        let mut out = Self::new();
        for coin in coins {
            out = out.add_coin(&coin)?;
        }
        Ok(out)
    }

    /// Amount held for a denom, zero when absent
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.amounts.get(denom).copied().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.amounts.values().all(|amount| *amount == 0)
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Denoms in sorted order
    pub fn denoms(&self) -> Vec<String> {
        self.amounts.keys().cloned().collect()
    }

    /// Iterate coins in denom order
    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.amounts
            .iter()
            .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
    }

    /// Return a new set with `coin` added
    pub fn add_coin(&self, coin: &Coin) -> Result<Self> {
        let mut out = self.clone();
        if coin.amount == 0 {
            return Ok(out);
        }
        let entry = out.amounts.entry(coin.denom.clone()).or_insert(0);
        *entry = entry
            .checked_add(coin.amount)
            .ok_or_else(|| IncentiveError::Overflow(format!("adding {}", coin)))?;
        Ok(out)
    }

    /// Return a new set holding the sum of both sets
    pub fn add(&self, other: &Coins) -> Result<Self> {
        other.iter().try_fold(self.clone(), |acc, coin| acc.add_coin(&coin))
    }

    /// Return a new set with `other` removed; `None` if any denom would go negative
    pub fn checked_sub(&self, other: &Coins) -> Option<Self> {
        let mut out = self.clone();
        for (denom, amount) in &other.amounts {
            let remaining = out.amount_of(denom).checked_sub(*amount)?;
            if remaining == 0 {
                out.amounts.remove(denom);
            } else {
                out.amounts.insert(denom.clone(), remaining);
            }
        }
        Some(out)
    }

    /// Check every denom is well formed
    pub fn validate(&self) -> Result<()> {
        for (denom, amount) in &self.amounts {
            validate_denom(denom)?;
            if *amount == 0 {
                return Err(IncentiveError::InvalidCoins(format!("zero amount for {}", denom)));
            }
        }
        Ok(())
    }
}

impl Serialize for Coins {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let as_text: BTreeMap<&str, String> = self
            .amounts
            .iter()
            .map(|(denom, amount)| (denom.as_str(), amount.to_string()))
            .collect();
        as_text.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let as_text = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut amounts = BTreeMap::new();
        for (denom, amount) in as_text {
            let amount: u128 = amount.parse().map_err(D::Error::custom)?;
            amounts.insert(denom, amount);
        }
        Ok(Self { amounts })
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
