//! HashMap-backed segment store.
//!
//! ## Architecture
//! - Keys are stored in a `HashMap<K, V, S>` for O(1) lookup.
//! - Capacity is enforced by entry count, not byte size. The table itself is
//!   not preallocated to that capacity; it grows like any `HashMap`.
//! - Room for a new entry is reserved with `try_reserve`, so allocation
//!   failure surfaces as [`StoreError::Alloc`] instead of aborting, and stays
//!   distinct from the capacity signal [`InsertError::Full`].
//!
//! ## Key Components
//! - `HashMapStore`: single-threaded bounded segment.
//! - `HashMapStoreFactory`: creates segments sharing one hasher builder.
//!
//! ## Example Usage
//! ```rust
//! use topkit::store::hashmap::HashMapStore;
//! use topkit::store::traits::{InsertError, StoreCore, StoreMut};
//!
//! let mut store: HashMapStore<u64, &str> = HashMapStore::new(1);
//! assert_eq!(store.try_insert(1, "a"), Ok(None));
//! assert!(matches!(store.try_insert(2, "b"), Err(InsertError::Full { key: 2, .. })));
//! assert_eq!(store.try_insert(1, "c"), Ok(Some("a")));
//! assert!(store.contains(&1));
//! ```
//!
//! ## Type Constraints
//! - `K: Eq + Hash` for key lookup.
//! - `S: BuildHasher` for custom hashers (defaults to `FxBuildHasher`).
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxBuildHasher;

use crate::error::StoreError;
use crate::store::traits::{InsertError, StoreCore, StoreFactory, StoreMetrics, StoreMut};

/// Store metrics counters.
///
/// Atomics let `get(&self)` record hits and misses without `&mut`.
#[derive(Debug, Default)]
struct StoreCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
}

impl StoreCounters {
    /// Snapshot current store metrics.
    fn snapshot(&self) -> StoreMetrics {
        StoreMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
        }
    }

    fn inc_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }
}

/// Single-threaded HashMap-backed segment with a hard key limit.
#[derive(Debug)]
pub struct HashMapStore<K, V, S = FxBuildHasher> {
    map: HashMap<K, V, S>,
    capacity: usize,
    metrics: StoreCounters,
}

impl<K, V> HashMapStore<K, V, FxBuildHasher>
where
    K: Eq + Hash,
{
    /// Create a store with a fixed capacity and the default hasher.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, FxBuildHasher)
    }
}

impl<K, V, S> HashMapStore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Create a store with a fixed capacity and custom hasher.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
            capacity,
            metrics: StoreCounters::default(),
        }
    }

    /// Fetch a value by key without touching access counters.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }
}

impl<K, V, S> StoreCore<K, V> for HashMapStore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn get(&self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(value) => {
                self.metrics.inc_hit();
                Some(value)
            },
            None => {
                self.metrics.inc_miss();
                None
            },
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.map.iter()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn metrics(&self) -> StoreMetrics {
        self.metrics.snapshot()
    }
}

impl<K, V, S> StoreMut<K, V> for HashMapStore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError<K, V>> {
        if let Some(slot) = self.map.get_mut(&key) {
            self.metrics.inc_update();
            return Ok(Some(std::mem::replace(slot, value)));
        }
        if self.map.len() >= self.capacity {
            return Err(InsertError::Full { key, value });
        }
        self.map
            .try_reserve(1)
            .map_err(|err| InsertError::Store(StoreError::from(err)))?;
        self.map.insert(key, value);
        self.metrics.inc_insert();
        Ok(None)
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

/// Creates [`HashMapStore`] segments that share a hasher builder.
#[derive(Debug, Clone, Default)]
pub struct HashMapStoreFactory<S = FxBuildHasher> {
    hasher: S,
}

impl<S> HashMapStoreFactory<S> {
    /// Create a factory handing `hasher` clones to every segment.
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<K, V, S> StoreFactory<K, V> for HashMapStoreFactory<S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    type Store = HashMapStore<K, V, S>;

    fn create(&self, capacity: usize) -> Self::Store {
        HashMapStore::with_hasher(capacity, self.hasher.clone())
    }
}
