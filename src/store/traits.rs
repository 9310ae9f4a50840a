//! Segment store contracts.
//!
//! A segment is one fixed-capacity key/value table. Stores focus on
//! key/value ownership and lookup semantics, while the segmented map decides
//! where new keys go and when to allocate another segment. This keeps the
//! overflow logic independent of how a single segment is implemented.

use crate::error::StoreError;

/// Snapshot of store-level metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
}

impl StoreMetrics {
    /// Sums two snapshots field by field.
    pub fn merge(self, other: StoreMetrics) -> StoreMetrics {
        StoreMetrics {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            inserts: self.inserts + other.inserts,
            updates: self.updates + other.updates,
        }
    }
}

/// Reason a segment refused an insert.
///
/// `Full` is the capacity signal and hands the rejected entry back so it can
/// be placed in a fresh segment without cloning. Everything else is carried
/// by `Store` and must never be mistaken for capacity exhaustion.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertError<K, V> {
    /// Segment is at capacity and `key` is not already present.
    Full { key: K, value: V },
    /// Backend failure unrelated to capacity.
    Store(StoreError),
}

/// Read-only segment operations.
pub trait StoreCore<K, V> {
    /// Fetch a value by key.
    fn get(&self, key: &K) -> Option<&V>;

    /// Check if a key exists.
    fn contains(&self, key: &K) -> bool;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Check if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of distinct keys this segment accepts.
    fn capacity(&self) -> usize;

    /// Iterate over all entries in unspecified order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;

    /// Check if a new key would be rejected.
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Snapshot the store's current metrics.
    fn metrics(&self) -> StoreMetrics {
        StoreMetrics::default()
    }
}

/// Mutable segment operations.
pub trait StoreMut<K, V>: StoreCore<K, V> {
    /// Fetch a mutable reference to a value by key.
    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Insert or update a value. Returns the previous value if present.
    ///
    /// Updating an existing key never fails with [`InsertError::Full`].
    fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError<K, V>>;

    /// Remove all entries. Capacity is unchanged.
    fn clear(&mut self);
}

/// Factory for creating empty segments on demand.
pub trait StoreFactory<K, V> {
    type Store: StoreMut<K, V>;

    /// Create a new empty store accepting at most `capacity` keys.
    fn create(&self, capacity: usize) -> Self::Store;
}
