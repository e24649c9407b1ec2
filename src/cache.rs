//! In-memory memoisation keyed by the arguments of an expensive lookup.
//!
//! Each key owns a [`OnceCell`]. Concurrent callers asking for the same key all
//! await the same initialisation, so at most one lookup is in flight per key.
//! Values are never replaced once stored.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

pub struct KeyedCache<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, running `init` only if no value has been stored yet.
    ///
    /// The map lock is held just long enough to find or create the key's cell; `init` itself
    /// runs outside of it, so lookups for different keys do not wait on each other.
    pub async fn get_or_init<F, Fut>(&self, key: K, init: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = {
            let mut cells = self.cells.lock().await;
            match cells.entry(key) {
                Entry::Occupied(entry) => Arc::clone(entry.get()),
                Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(OnceCell::new()))),
            }
        };

        cell.get_or_init(init).await.clone()
    }

    /// Returns the stored value for `key` without initialising it.
    pub async fn get(&self, key: &K) -> Option<V> {
        let cells = self.cells.lock().await;
        cells.get(key).and_then(|cell| cell.get().cloned())
    }

    pub async fn contains_key(&self, key: &K) -> bool {
        self.get(key).await.is_some()
    }

    /// Number of keys holding a resolved value.
    pub async fn len(&self) -> usize {
        let cells = self.cells.lock().await;
        cells.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
