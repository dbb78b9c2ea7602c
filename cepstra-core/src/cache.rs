//! Construct-once, then read-only, keyed cache.
//!
//! Values are built outside the lock on a miss. If two threads race on the
//! same key, the first insert wins and the other build is discarded, so every
//! caller observes one frozen `Arc<V>` per key.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;

pub struct FrozenCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash, V> FrozenCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, building it with `build` on a miss.
    ///
    /// # Errors
    /// Whatever `build` returns; nothing is cached in that case.
    pub fn get_or_try_insert_with<F>(&self, key: K, build: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let built = Arc::new(build()?);
        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(key).or_insert(built)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K: Eq + Hash, V> Default for FrozenCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for FrozenCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrozenCache")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}
