//! Transaction write buffer
//!
//! Reads fall through to the parent store; writes and deletes are held
//! until [`CacheStore::commit`]. Dropping or discarding the cache leaves the
//! parent untouched, which gives an operation all-or-nothing semantics.

use crate::kv::KvStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::trace;

/// Buffered writes over a parent store
pub struct CacheStore<S: KvStore> {
    parent: S,
    /// Pending writes; `None` marks a delete
    writes: RwLock<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
}

impl<S: KvStore> CacheStore<S> {
    pub fn new(parent: S) -> Self {
        Self {
            parent,
            writes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of pending writes and deletes
    pub fn pending(&self) -> usize {
        self.writes.read().len()
    }

    /// Flush pending writes to the parent and return it
    pub fn commit(self) -> S {
        let writes = self.writes.into_inner();
        trace!(count = writes.len(), "Committing cached writes");
        for (key, value) in writes {
            match value {
                Some(v) => self.parent.set(&key, v),
                None => {
                    self.parent.delete(&key);
                }
            }
        }
        self.parent
    }

    /// Drop pending writes and return the parent unchanged
    pub fn discard(self) -> S {
        trace!(count = self.writes.read().len(), "Discarding cached writes");
        self.parent
    }
}

impl<S: KvStore> KvStore for CacheStore<S> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.read().get(key) {
            Some(pending) => pending.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.writes.write().insert(key.to_vec(), Some(value));
    }

    fn delete(&self, key: &[u8]) -> bool {
        let existed = self.has(key);
        self.writes.write().insert(key.to_vec(), None);
        existed
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iterate_prefix(prefix).into_iter().collect();

        let writes = self.writes.read();
        for (key, value) in writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}
