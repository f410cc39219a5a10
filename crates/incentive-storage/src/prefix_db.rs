//! Namespaced view over a parent store

use crate::kv::KvStore;

/// View that prepends a fixed prefix to every key.
///
/// Keys returned by `iterate_prefix` have the view prefix stripped.
pub struct PrefixStore<S: KvStore> {
    parent: S,
    prefix: Vec<u8>,
}

impl<S: KvStore> PrefixStore<S> {
    pub fn new(parent: S, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            parent,
            prefix: prefix.into(),
        }
    }

    /// View prefix
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(&self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl<S: KvStore> KvStore for PrefixStore<S> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.parent.get(&self.full_key(key))
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.parent.set(&self.full_key(key), value)
    }

    fn delete(&self, key: &[u8]) -> bool {
        self.parent.delete(&self.full_key(key))
    }

    fn has(&self, key: &[u8]) -> bool {
        self.parent.has(&self.full_key(key))
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let strip = self.prefix.len();
        self.parent
            .iterate_prefix(&self.full_key(prefix))
            .into_iter()
            .map(|(k, v)| (k[strip..].to_vec(), v))
            .collect()
    }
}
