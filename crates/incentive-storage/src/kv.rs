//! Store trait shared by every backend

use std::sync::Arc;

/// Ordered byte-keyed store with interior mutability.
///
/// All methods take `&self`; backends guard their state with locks so a
/// store can be shared between the engine and its callers.
pub trait KvStore {
    /// Value stored under `key`
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &[u8], value: Vec<u8>);

    /// Remove `key`, returning whether it was present
    fn delete(&self, key: &[u8]) -> bool;

    /// Whether `key` is present
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// All entries whose key starts with `prefix`, in ascending key order
    fn iterate_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) -> bool {
        (**self).delete(key)
    }

    fn has(&self, key: &[u8]) -> bool {
        (**self).has(key)
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        (**self).iterate_prefix(prefix)
    }
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) -> bool {
        (**self).delete(key)
    }

    fn has(&self, key: &[u8]) -> bool {
        (**self).has(key)
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        (**self).iterate_prefix(prefix)
    }
}
