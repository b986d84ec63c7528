//! Concurrent load-or-get cache for compiled models
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

/// One key's entry. `loading` serialises loaders for this key only.
struct Slot<V> {
    value: OnceLock<Arc<V>>,
    loading: Mutex<()>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            value: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }
}

/// Process-lifetime cache of shared, immutable models.
///
/// Lookups take a shared lock on the key map. A miss takes the map's
/// write lock only long enough to find or create the key's slot, then
/// loads under that slot's own mutex, so a slow load never blocks other
/// keys. Entries are never evicted and failed loads are not stored.
pub struct ModelCache<K, V> {
    slots: RwLock<HashMap<K, Arc<Slot<V>>>>,
}

impl<K, V> ModelCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Cached value, without loading
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.slots
            .read()
            .get(key)
            .and_then(|slot| slot.value.get().cloned())
    }

    /// Return the cached value or run `load` to produce it.
    ///
    /// Concurrent callers for the same key run `load` at most once
    /// between them and all receive the same `Arc`. An `Err` from `load`
    /// is returned to its caller and the next call tries again.
    pub fn get_or_try_load<E, F>(&self, key: &K, load: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let slot = {
            let mut slots = self.slots.write();
            Arc::clone(
                slots
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Slot::new())),
            )
        };

        let _loading = slot.loading.lock();
        if let Some(value) = slot.value.get() {
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(load()?);
        // Only the holder of `loading` sets the value, so this cannot race
        let _ = slot.value.set(Arc::clone(&value));
        Ok(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Number of populated entries
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.value.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for ModelCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ModelCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCache")
            .field("entries", &self.len())
            .finish()
    }
}
