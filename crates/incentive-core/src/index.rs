//! # Reward Index Algebra
//!
//! A reward index records, for one reward denom, the cumulative reward paid
//! per unit of source share since tracking began. Indexes come in two shapes:
//!
//! ```text
//! RewardIndexes       [ (jinx, 0.0105), (ufury, 0.2) ]          one source key
//! MultiRewardIndexes  [ (bnb, RewardIndexes), (btcb, ...) ]     keyed by source key
//! ```
//!
//! Both are insertion-ordered maps, so each key is held at most once and
//! replacing a key keeps its position. All operations return new values and
//! never alias the caller's collection.

use crate::coins::validate_denom;
use crate::decimal::Dec;
use crate::error::{IncentiveError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cumulative reward factor for one reward denom
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardIndex {
    /// Reward denom
    pub denom: String,
    /// Reward paid per unit of source share
    pub factor: Dec,
}

impl RewardIndex {
    pub fn new(denom: impl Into<String>, factor: Dec) -> Self {
        Self {
            denom: denom.into(),
            factor,
        }
    }
}

/// Ordered set of reward factors, one per reward denom
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardIndexes(IndexMap<String, Dec>);

impl RewardIndexes {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Factor for a denom, `None` when the denom is not tracked
    pub fn get(&self, denom: &str) -> Option<Dec> {
        self.0.get(denom).copied()
    }

    /// Return a copy with `denom` set to `factor`, replacing in place or appending
    pub fn with(&self, denom: &str, factor: Dec) -> Self {
        let mut out = self.clone();
        out.0.insert(denom.to_string(), factor);
        out
    }

    /// Reward denoms in insertion order
    pub fn denoms(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = RewardIndex> + '_ {
        self.0
            .iter()
            .map(|(denom, factor)| RewardIndex::new(denom.clone(), *factor))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every denom is well formed
    pub fn validate(&self) -> Result<()> {
        self.0.keys().try_for_each(|denom| validate_denom(denom))
    }
}

impl FromIterator<RewardIndex> for RewardIndexes {
    fn from_iter<I: IntoIterator<Item = RewardIndex>>(iter: I) -> Self {
        Self(iter.into_iter().map(|ri| (ri.denom, ri.factor)).collect())
    }
}

/// Reward indexes of one source key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRewardIndex {
    /// Source key (collateral type, lending denom, pool id, vault denom)
    pub source_key: String,
    /// Reward factors for the source key
    pub indexes: RewardIndexes,
}

impl MultiRewardIndex {
    pub fn new(source_key: impl Into<String>, indexes: RewardIndexes) -> Self {
        Self {
            source_key: source_key.into(),
            indexes,
        }
    }
}

/// Reward indexes keyed by source key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiRewardIndexes(IndexMap<String, RewardIndexes>);

impl MultiRewardIndexes {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Indexes for a source key, `None` when the key is not tracked
    pub fn get(&self, source_key: &str) -> Option<&RewardIndexes> {
        self.0.get(source_key)
    }

    pub fn contains(&self, source_key: &str) -> bool {
        self.0.contains_key(source_key)
    }

    /// Return a copy with `source_key` set to `indexes`, replacing in place or appending
    pub fn with(&self, source_key: &str, indexes: RewardIndexes) -> Self {
        let mut out = self.clone();
        out.0.insert(source_key.to_string(), indexes);
        out
    }

    /// Return a copy without the entry for `source_key`, keeping the order of the rest
    pub fn remove_entry(&self, source_key: &str) -> Self {
        let mut out = self.clone();
        out.0.shift_remove(source_key);
        out
    }

    /// Source keys in insertion order
    pub fn source_keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = MultiRewardIndex> + '_ {
        self.0
            .iter()
            .map(|(source_key, indexes)| MultiRewardIndex::new(source_key.clone(), indexes.clone()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check source keys are non-empty and every nested index is valid
    pub fn validate(&self) -> Result<()> {
        for (source_key, indexes) in &self.0 {
            if source_key.is_empty() {
                return Err(IncentiveError::InvalidParams(
                    "reward index source key must be defined".to_string(),
                ));
            }
            indexes.validate()?;
        }
        Ok(())
    }
}

impl FromIterator<MultiRewardIndex> for MultiRewardIndexes {
    fn from_iter<I: IntoIterator<Item = MultiRewardIndex>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|mi| (mi.source_key, mi.indexes))
                .collect(),
        )
    }
}

/// Items of `a` that are not in `b`, in the order they appear in `a`
pub fn set_difference(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|item| !b.contains(item)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Dec {
        s.parse().expect("valid decimal")
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get() {
        let indexes = RewardIndexes::new().with("jinx", dec("0.2"));
        assert_eq!(indexes.get("jinx"), Some(dec("0.2")));
        assert_eq!(indexes.get("ufury"), None);
    }

    #[test]
    fn test_get_distinguishes_absent_from_zero() {
        let indexes = RewardIndexes::new().with("jinx", Dec::ZERO);
        assert_eq!(indexes.get("jinx"), Some(Dec::ZERO));
        assert_eq!(indexes.get("ufury"), None);
    }

    #[test]
    fn test_with_replaces_existing() {
        let indexes = RewardIndexes::new()
            .with("jinx", dec("0.1"))
            .with("ufury", dec("0.3"))
            .with("jinx", dec("0.5"));

        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes.get("jinx"), Some(dec("0.5")));
        assert_eq!(indexes.denoms(), strings(&["jinx", "ufury"]));
    }

    #[test]
    fn test_with_does_not_alias() {
        let original = RewardIndexes::new().with("jinx", dec("0.1"));
        let updated = original.with("jinx", dec("0.9"));

        assert_eq!(original.get("jinx"), Some(dec("0.1")));
        assert_eq!(updated.get("jinx"), Some(dec("0.9")));
    }

    #[test]
    fn test_multi_with_and_remove() {
        let jinx = RewardIndexes::new().with("jinx", dec("0.1"));
        let multi = MultiRewardIndexes::new()
            .with("bnb", jinx.clone())
            .with("btcb", RewardIndexes::new());

        assert_eq!(multi.source_keys(), strings(&["bnb", "btcb"]));
        assert_eq!(multi.get("bnb"), Some(&jinx));

        let removed = multi.remove_entry("bnb");
        assert_eq!(removed.source_keys(), strings(&["btcb"]));
        assert!(multi.contains("bnb"));

        // removing an absent key is a no-op
        assert_eq!(removed.remove_entry("xrpb"), removed);
    }

    #[test]
    fn test_set_difference() {
        let a = strings(&["bnb", "btcb", "xrpb"]);
        let b = strings(&["btcb"]);

        assert_eq!(set_difference(&a, &b), strings(&["bnb", "xrpb"]));
        assert_eq!(set_difference(&b, &a), Vec::<String>::new());
        assert_eq!(set_difference(&a, &[]), a);
    }

    #[test]
    fn test_validate() {
        let bad_denom = RewardIndexes::new().with("1jinx", Dec::ZERO);
        assert!(bad_denom.validate().is_err());

        let empty_key = MultiRewardIndexes::new().with("", RewardIndexes::new());
        assert!(empty_key.validate().is_err());

        let nested = MultiRewardIndexes::new().with("bnb", bad_denom);
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_from_iter_keeps_last_duplicate() {
        let indexes: RewardIndexes = vec![
            RewardIndex::new("jinx", Dec::ZERO),
            RewardIndex::new("ufury", dec("0.1")),
            RewardIndex::new("jinx", Dec::ONE),
        ]
        .into_iter()
        .collect();

        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes.denoms(), strings(&["jinx", "ufury"]));
        assert_eq!(indexes.get("jinx"), Some(Dec::ONE));
    }

    #[test]
    fn test_remove_keeps_order() {
        let multi = MultiRewardIndexes::new()
            .with("bnb", RewardIndexes::new())
            .with("btcb", RewardIndexes::new())
            .with("xrpb", RewardIndexes::new());

        assert_eq!(multi.remove_entry("btcb").source_keys(), strings(&["bnb", "xrpb"]));
    }
}
