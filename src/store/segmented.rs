//! Unbounded key/value map built from fixed-capacity segments.
//!
//! A single segment refuses new keys once it holds `segment_capacity` of
//! them. Instead of failing, [`SegmentedMap`] moves on to the next segment,
//! allocating one from its [`StoreFactory`] only when none is left. Lookups
//! scan segments front to back, so they cost O(1) amortized per segment and
//! O(segments) overall; segments fill completely before the next one is used,
//! which keeps that count small.
//!
//! ## Architecture
//!
//! ```text
//!   segments: Vec<S>                          active
//!   ┌────────────┬────────────┬────────────┐    │
//!   │ segment 0  │ segment 1  │ segment 2  │ ◄──┘  new keys go here
//!   │ full (C)   │ full (C)   │ partial    │
//!   └────────────┴────────────┴────────────┘
//!
//!   set(k, v):
//!     1. k already in some segment?  → overwrite in place
//!     2. try_insert into segments[active]
//!          Ok             → done
//!          Full { k, v }  → active += 1 (allocate a segment if none left), retry
//!          Store(err)     → propagate unchanged
//! ```
//!
//! ## Invariants
//! - At least one segment always exists.
//! - A key appears in at most one segment.
//! - Every segment before `active` is full; every segment after it is empty.
//! - Segments are only appended, never dropped. `clear` empties them in place
//!   and rewinds `active` to the first one.
//!
//! ## Example Usage
//!
//! ```
//! use topkit::store::segmented::SegmentedMap;
//!
//! let mut map: SegmentedMap<u32, &str> = SegmentedMap::new(2);
//! for key in 0..5 {
//!     map.set(key, "v").unwrap();
//! }
//! assert_eq!(map.len(), 5);
//! assert_eq!(map.segment_count(), 3);
//! assert_eq!(map.get(&4), Some(&"v"));
//! ```
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::{ConfigError, InvariantError, StoreError};
use crate::store::hashmap::HashMapStoreFactory;
use crate::store::traits::{InsertError, StoreCore, StoreFactory, StoreMetrics, StoreMut};

/// Key/value map without a key-count ceiling, composed of bounded segments.
pub struct SegmentedMap<K, V, F = HashMapStoreFactory>
where
    F: StoreFactory<K, V>,
{
    segments: Vec<F::Store>,
    active: usize,
    segment_capacity: usize,
    factory: F,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V, F> SegmentedMap<K, V, F>
where
    F: StoreFactory<K, V> + Default,
{
    /// Creates a map whose segments hold `segment_capacity` keys each.
    ///
    /// # Panics
    ///
    /// Panics if `segment_capacity` is zero.
    pub fn new(segment_capacity: usize) -> Self {
        Self::with_factory(segment_capacity, F::default())
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(segment_capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_factory(segment_capacity, F::default())
    }
}

impl<K, V, F> SegmentedMap<K, V, F>
where
    F: StoreFactory<K, V>,
{
    /// Creates a map that builds its segments with `factory`.
    ///
    /// # Panics
    ///
    /// Panics if `segment_capacity` is zero.
    pub fn with_factory(segment_capacity: usize, factory: F) -> Self {
        match Self::try_with_factory(segment_capacity, factory) {
            Ok(map) => map,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`with_factory`](Self::with_factory).
    pub fn try_with_factory(segment_capacity: usize, factory: F) -> Result<Self, ConfigError> {
        if segment_capacity == 0 {
            return Err(ConfigError::new("segment_capacity must be > 0"));
        }
        let first = factory.create(segment_capacity);
        Ok(Self {
            segments: vec![first],
            active: 0,
            segment_capacity,
            factory,
            _marker: PhantomData,
        })
    }

    /// Returns the value stored for `key`, scanning segments in creation order.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.segments.iter().find_map(|segment| segment.get(key))
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.segments
            .iter_mut()
            .find_map(|segment| segment.get_mut(key))
    }

    /// Returns `true` if `key` is present in any segment.
    pub fn contains(&self, key: &K) -> bool {
        self.segments.iter().any(|segment| segment.contains(key))
    }

    /// Inserts or overwrites the value for `key`.
    ///
    /// Existing keys are overwritten in whichever segment holds them. New keys
    /// go to the active segment; a full segment is never an error, the map
    /// moves to the next one instead. Any other store failure is returned
    /// unchanged.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, StoreError> {
        if let Some(slot) = self.get_mut(&key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        self.insert_new(key, value)?;
        Ok(None)
    }

    /// Inserts a key the caller has just looked up and not found.
    ///
    /// Skips the scan `set` does for existing keys; inserting a key that is
    /// already present would leave it in two segments.
    pub(crate) fn insert_new(&mut self, key: K, value: V) -> Result<(), StoreError> {
        debug_assert!(!self.contains(&key), "insert_new called with a present key");

        let (mut key, mut value) = (key, value);
        loop {
            match self.segments[self.active].try_insert(key, value) {
                Ok(_) => return Ok(()),
                Err(InsertError::Store(err)) => return Err(err),
                Err(InsertError::Full { key: k, value: v }) => {
                    key = k;
                    value = v;
                    self.advance();
                },
            }
        }
    }

    /// Moves `active` to the next segment, allocating one if none is left.
    fn advance(&mut self) {
        self.active += 1;
        if self.active == self.segments.len() {
            let segment = self.factory.create(self.segment_capacity);
            self.segments.push(segment);
            debug!(
                segments = self.segments.len(),
                segment_capacity = self.segment_capacity,
                "allocated map segment"
            );
        }
    }

    /// Empties every segment while keeping them allocated.
    pub fn clear(&mut self) {
        for segment in &mut self.segments {
            segment.clear();
        }
        self.active = 0;
    }

    /// Total number of keys across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|segment| segment.len()).sum()
    }

    /// Returns `true` if no segment holds a key.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|segment| segment.is_empty())
    }

    /// Number of segments allocated so far (never shrinks).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Key capacity of each segment.
    pub fn segment_capacity(&self) -> usize {
        self.segment_capacity
    }

    /// Iterates over all entries, segment by segment.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.segments.iter().flat_map(|segment| segment.iter())
    }

    /// Aggregated store metrics over all segments.
    pub fn metrics(&self) -> StoreMetrics {
        self.segments
            .iter()
            .map(|segment| segment.metrics())
            .fold(StoreMetrics::default(), StoreMetrics::merge)
    }

    /// Verifies the segment layout and key uniqueness.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Eq + Hash + fmt::Debug,
    {
        if self.segments.is_empty() {
            return Err(InvariantError::new("segmented map has no segments"));
        }
        if self.active >= self.segments.len() {
            return Err(InvariantError::new(format!(
                "active segment {} out of range ({} segments)",
                self.active,
                self.segments.len()
            )));
        }

        let mut seen = HashSet::new();
        for (idx, segment) in self.segments.iter().enumerate() {
            if segment.len() > self.segment_capacity {
                return Err(InvariantError::new(format!(
                    "segment {idx} holds {} keys, capacity is {}",
                    segment.len(),
                    self.segment_capacity
                )));
            }
            if idx < self.active && !segment.is_full() {
                return Err(InvariantError::new(format!(
                    "segment {idx} precedes the active segment but is not full"
                )));
            }
            if idx > self.active && !segment.is_empty() {
                return Err(InvariantError::new(format!(
                    "segment {idx} follows the active segment but is not empty"
                )));
            }
            for (key, _) in segment.iter() {
                if !seen.insert(key) {
                    return Err(InvariantError::new(format!(
                        "key {key:?} present in more than one segment"
                    )));
                }
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self)
    where
        K: Eq + Hash + fmt::Debug,
    {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K, V, F> fmt::Debug for SegmentedMap<K, V, F>
where
    F: StoreFactory<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedMap")
            .field("len", &self.len())
            .field("segments", &self.segments.len())
            .field("active", &self.active)
            .field("segment_capacity", &self.segment_capacity)
            .finish()
    }
}
