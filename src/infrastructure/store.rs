//! Storage implementation for aggregate state.
//!
//! Provides concurrent, sharded storage for bucket entries. DashMap gives
//! lock-free reads and fine-grained write locking, which suits the
//! many-writers shape of a metric emission hot path.

use crate::application::ports::Storage;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::hash::Hash;

/// Thread-safe sharded store backed by DashMap, hashed with ahash.
pub struct ShardedStore<K, V>
where
    K: Eq + Hash + Clone,
{
    map: DashMap<K, V, RandomState>,
}

impl<K, V> ShardedStore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new store.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
        }
    }
}

impl<K, V> Default for ShardedStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for ShardedStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("len", &self.map.len())
            .finish()
    }
}

impl<K, V> Storage<K, V> for ShardedStore<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        let entry = self.map.entry(key);
        let mut value_ref = entry.or_insert_with(factory);
        accessor(&mut value_ref)
    }

    fn insert_if_absent(&self, key: K, value: V) -> bool {
        match self.map.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn drain_matching<F>(&self, predicate: F) -> Vec<(K, V)>
    where
        F: Fn(&K, &V) -> bool,
    {
        // Collect matching keys first, then remove each under a re-check so
        // entries mutated in between are not drained by a stale match.
        let keys: Vec<K> = self
            .map
            .iter()
            .filter(|entry| predicate(entry.key(), entry.value()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut drained = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(pair) = self.map.remove_if(&key, |k, v| predicate(k, v)) {
                drained.push(pair);
            }
        }
        drained
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.map.iter() {
            f(entry.key(), entry.value());
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn clear(&self) {
        self.map.clear()
    }
}

// Implement Storage for Arc<ShardedStore> so the shared handle can be used
// directly as a storage value.
impl<K, V> Storage<K, V> for std::sync::Arc<ShardedStore<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        (**self).with_entry_mut(key, factory, accessor)
    }

    fn insert_if_absent(&self, key: K, value: V) -> bool {
        (**self).insert_if_absent(key, value)
    }

    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    fn drain_matching<F>(&self, predicate: F) -> Vec<(K, V)>
    where
        F: Fn(&K, &V) -> bool,
    {
        (**self).drain_matching(predicate)
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V),
    {
        (**self).for_each(f)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_entry_mut_creates_and_updates() {
        let store: ShardedStore<&str, i64> = ShardedStore::new();

        let result = store.with_entry_mut("key", || 10, |v| {
            *v += 5;
            *v
        });
        assert_eq!(result, 15);

        let result = store.with_entry_mut("key", || 0, |v| {
            *v += 1;
            *v
        });
        assert_eq!(result, 16, "existing entry is reused, not rebuilt");
    }

    #[test]
    fn test_insert_if_absent() {
        let store: ShardedStore<&str, i64> = ShardedStore::new();

        assert!(store.insert_if_absent("key", 1));
        assert!(!store.insert_if_absent("key", 2));
        store.with_entry_mut("key", || 0, |v| assert_eq!(*v, 1));
    }

    #[test]
    fn test_drain_matching_removes_and_returns() {
        let store: ShardedStore<i64, i64> = ShardedStore::new();
        for i in 0..10 {
            store.with_entry_mut(i, || i * 10, |_| ());
        }

        let mut drained = store.drain_matching(|key, _| key % 2 == 0);
        drained.sort_unstable();

        assert_eq!(drained, vec![(0, 0), (2, 20), (4, 40), (6, 60), (8, 80)]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_drain_matching_none() {
        let store: ShardedStore<i64, i64> = ShardedStore::new();
        store.with_entry_mut(1, || 1, |_| ());

        assert!(store.drain_matching(|_, _| false).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let store: ShardedStore<&str, i64> = ShardedStore::new();
        store.with_entry_mut("a", || 1, |_| ());
        store.with_entry_mut("b", || 2, |_| ());
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let store: Arc<ShardedStore<String, i64>> = Arc::new(ShardedStore::new());
        let mut handles = vec![];

        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    store.with_entry_mut(format!("key_{}_{}", i, j), || 0, |v| *v += 1);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
    }
}
