use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, RwLock},
};

/// Keyed store where the first value written for a key wins forever.
///
/// Writers only ever add keys, so a reader never observes a value change under an existing key.
/// The lock is never held while a value is being computed.
#[derive(Debug)]
pub(crate) struct AppendOnlyCache<K, V> {
    inner: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for AppendOnlyCache<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> AppendOnlyCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
        let map = self.inner.read().unwrap_or_else(|p| p.into_inner());
        map.get(key).cloned()
    }

    /// Insert `value` unless the key is already present. Returns the stored value either way.
    pub(crate) fn insert(&self, key: K, value: V) -> Arc<V> {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.entry(key).or_insert_with(|| Arc::new(value)).clone()
    }

    /// Return the cached value, computing it outside the lock on a miss.
    pub(crate) fn get_or_insert_with(&self, key: K, f: impl FnOnce() -> V) -> Arc<V> {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        self.insert(key, f())
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/cache.rs"]
mod tests;
