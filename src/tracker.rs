//! Request tracker: per-key counts plus a live top-N leaderboard.
//!
//! [`RequestTracker`] ties the pieces together. Each event carries a key:
//!
//! ```text
//!   record(key)
//!     ├── index.get(key) ──────────── hit ──► CounterId
//!     │        └─ miss ─► arena.insert(key), index.set(key, id)
//!     │                   leaderboard.admit_new(id)   (only while filling)
//!     ├── arena[id].increment()
//!     ├── leaderboard.offer(id)    (O(1) skip when already a member)
//!     └── leaderboard.resort()     (stable, near-linear on sorted input)
//! ```
//!
//! The tracker is an explicitly owned value with a `new`/`reset` lifecycle;
//! there is no global state. It is single-writer: wrap it in one lock per
//! call if several threads record events, as
//! [`ConcurrentRequestTracker`](crate::tracker::ConcurrentRequestTracker) does
//! with the `concurrency` feature.
//!
//! ## Example Usage
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use topkit::builder::TrackerBuilder;
//! use topkit::ds::RankedEntry;
//!
//! let mut tracker = TrackerBuilder::new(3).build::<Ipv4Addr>();
//! let hits = [
//!     (Ipv4Addr::new(1, 1, 1, 1), 1),
//!     (Ipv4Addr::new(2, 2, 2, 2), 2),
//!     (Ipv4Addr::new(3, 3, 3, 3), 3),
//!     (Ipv4Addr::new(4, 4, 4, 4), 1),
//! ];
//! for (ip, times) in hits {
//!     for _ in 0..times {
//!         tracker.record(ip).unwrap();
//!     }
//! }
//!
//! let top = tracker.top_n();
//! assert_eq!(
//!     top,
//!     vec![
//!         RankedEntry { key: Ipv4Addr::new(3, 3, 3, 3), count: 3 },
//!         RankedEntry { key: Ipv4Addr::new(2, 2, 2, 2), count: 2 },
//!         RankedEntry { key: Ipv4Addr::new(1, 1, 1, 1), count: 1 },
//!     ]
//! );
//!
//! tracker.reset();
//! assert!(tracker.top_n().is_empty());
//! ```
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::builder::TrackerBuilder;
use crate::ds::counter::{CounterArena, CounterId};
use crate::ds::leaderboard::{Leaderboard, RankedEntry};
#[cfg(feature = "metrics")]
use crate::ds::leaderboard::Admission;
use crate::error::{InvariantError, StoreError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::TrackerMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TrackerMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    MetricsSnapshotProvider, TrackerMetricsReadRecorder, TrackerMetricsRecorder,
};
use crate::store::hashmap::HashMapStoreFactory;
use crate::store::segmented::SegmentedMap;
use crate::store::traits::StoreFactory;

/// Counts events per key and keeps the top-N keys sorted by count.
pub struct RequestTracker<K, F = HashMapStoreFactory>
where
    F: StoreFactory<K, CounterId>,
{
    index: SegmentedMap<K, CounterId, F>,
    counters: CounterArena<K>,
    leaderboard: Leaderboard,
    #[cfg(feature = "metrics")]
    metrics: TrackerMetrics,
}

impl<K> RequestTracker<K, HashMapStoreFactory>
where
    K: Eq + Hash + Clone,
{
    /// Creates a tracker ranking the top `top_n` keys, with default segments.
    ///
    /// # Panics
    ///
    /// Panics if `top_n` is zero. Use [`TrackerBuilder::try_build`] for a
    /// fallible constructor.
    pub fn new(top_n: usize) -> Self {
        TrackerBuilder::new(top_n).build()
    }
}

impl<K, F> RequestTracker<K, F>
where
    K: Eq + Hash + Clone,
    F: StoreFactory<K, CounterId>,
{
    pub(crate) fn from_parts(index: SegmentedMap<K, CounterId, F>, top_n: usize) -> Self {
        Self {
            index,
            counters: CounterArena::new(),
            leaderboard: Leaderboard::new(top_n),
            #[cfg(feature = "metrics")]
            metrics: TrackerMetrics::default(),
        }
    }

    /// Records one event for `key`.
    ///
    /// Looks up or creates the key's counter, increments it, offers it to the
    /// leaderboard and resorts. A store failure other than a full segment is
    /// returned unchanged and leaves the tracker untouched.
    pub fn record(&mut self, key: K) -> Result<(), StoreError> {
        let id = match self.index.get(&key) {
            Some(&id) => id,
            None => self.create_counter(key)?,
        };

        if let Some(counter) = self.counters.get_mut(id) {
            counter.increment();
        }
        let _admission = self.leaderboard.offer(id, &mut self.counters);
        self.leaderboard.resort(&self.counters);

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_event();
            self.metrics.record_admission(_admission);
        }
        Ok(())
    }

    /// Records one event per key yielded by `keys`, stopping at the first error.
    pub fn record_many<I>(&mut self, keys: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.record(key)?;
        }
        Ok(())
    }

    fn create_counter(&mut self, key: K) -> Result<CounterId, StoreError> {
        #[cfg(feature = "metrics")]
        let segments_before = self.index.segment_count();

        // Index first: if that fails, the arena stays untouched. The caller
        // just missed on `key`, so the index skips its own lookup.
        let id = self.counters.next_id();
        self.index.insert_new(key.clone(), id)?;
        let inserted = self.counters.insert(key);
        debug_assert_eq!(id, inserted);
        let _admission = self.leaderboard.admit_new(id, &mut self.counters);

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_counter_created();
            // A full board is judged by the `offer` that follows.
            if _admission == Admission::Admitted {
                self.metrics.record_admission(_admission);
            }
            for _ in segments_before..self.index.segment_count() {
                self.metrics.record_segment_allocated();
            }
        }
        Ok(id)
    }

    /// Current top-N keys, highest count first.
    ///
    /// Returns an independent copy; recording more events afterwards does not
    /// change it.
    pub fn top_n(&self) -> Vec<RankedEntry<K>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_top_n_call();

        self.leaderboard.snapshot(&self.counters)
    }

    /// Drops every counter and empties the leaderboard.
    ///
    /// Map segments stay allocated for reuse. Counts restart from zero.
    pub fn reset(&mut self) {
        let distinct = self.counters.len();
        self.index.clear();
        self.leaderboard.clear();
        self.counters.clear();
        debug!(
            distinct_keys = distinct,
            segments = self.index.segment_count(),
            "request tracker reset"
        );

        #[cfg(feature = "metrics")]
        self.metrics.record_reset();
    }

    /// Count recorded for `key` since the last reset.
    pub fn count_of(&self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        self.metrics.record_count_lookup();

        self.index
            .get(key)
            .and_then(|&id| self.counters.get(id))
            .map(|counter| counter.count())
    }

    /// Returns `true` if `key` is currently on the leaderboard.
    pub fn is_ranked(&self, key: &K) -> bool {
        self.index
            .get(key)
            .and_then(|&id| self.counters.get(id))
            .is_some_and(|counter| counter.is_on_leaderboard())
    }

    /// Number of distinct keys seen since the last reset.
    pub fn distinct_keys(&self) -> usize {
        self.counters.len()
    }

    pub fn leaderboard_len(&self) -> usize {
        self.leaderboard.len()
    }

    pub fn leaderboard_capacity(&self) -> usize {
        self.leaderboard.capacity()
    }

    pub fn segment_count(&self) -> usize {
        self.index.segment_count()
    }

    pub fn segment_capacity(&self) -> usize {
        self.index.segment_capacity()
    }

    /// Cross-checks the key index, the counter arena and the leaderboard.
    ///
    /// Verifies one counter per key, a well-formed segmented index, and that
    /// every counter's membership flag matches the leaderboard exactly.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: fmt::Debug,
    {
        self.index.check_invariants()?;

        if self.index.len() != self.counters.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but {} counters exist",
                self.index.len(),
                self.counters.len()
            )));
        }
        for (key, &id) in self.index.iter() {
            match self.counters.get(id) {
                Some(counter) if counter.key() == key => {},
                Some(counter) => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} maps to the counter of {:?}",
                        counter.key()
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} maps to dead counter {}",
                        id.index()
                    )));
                },
            }
        }

        self.leaderboard.check_invariants(&self.counters)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self)
    where
        K: fmt::Debug,
    {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K, F> fmt::Debug for RequestTracker<K, F>
where
    F: StoreFactory<K, CounterId>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestTracker")
            .field("index", &self.index)
            .field("distinct_keys", &self.counters.len())
            .field("leaderboard_len", &self.leaderboard.len())
            .field("leaderboard_capacity", &self.leaderboard.capacity())
            .finish()
    }
}

#[cfg(feature = "metrics")]
impl<K, F> RequestTracker<K, F>
where
    K: Eq + Hash + Clone,
    F: StoreFactory<K, CounterId>,
{
    pub fn metrics_snapshot(&self) -> TrackerMetricsSnapshot {
        TrackerMetricsSnapshot {
            distinct_keys: self.counters.len(),
            segments: self.index.segment_count(),
            leaderboard_len: self.leaderboard.len(),
            leaderboard_capacity: self.leaderboard.capacity(),
            ..self.metrics.counters_snapshot()
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, F> MetricsSnapshotProvider<TrackerMetricsSnapshot> for RequestTracker<K, F>
where
    K: Eq + Hash + Clone,
    F: StoreFactory<K, CounterId>,
{
    fn snapshot(&self) -> TrackerMetricsSnapshot {
        self.metrics_snapshot()
    }
}

/// Thread-safe wrapper running every operation under one lock.
///
/// `record` (lookup, increment, offer, resort) is applied as a single unit,
/// and `top_n` copies the leaderboard under the same exclusion, so readers
/// never observe a half-sorted ranking.
#[cfg(feature = "concurrency")]
pub struct ConcurrentRequestTracker<K, F = HashMapStoreFactory>
where
    F: StoreFactory<K, CounterId>,
{
    inner: parking_lot::Mutex<RequestTracker<K, F>>,
}

#[cfg(feature = "concurrency")]
impl<K, F> ConcurrentRequestTracker<K, F>
where
    K: Eq + Hash + Clone,
    F: StoreFactory<K, CounterId>,
{
    pub fn new(tracker: RequestTracker<K, F>) -> Self {
        Self {
            inner: parking_lot::Mutex::new(tracker),
        }
    }

    pub fn record(&self, key: K) -> Result<(), StoreError> {
        self.inner.lock().record(key)
    }

    pub fn top_n(&self) -> Vec<RankedEntry<K>> {
        self.inner.lock().top_n()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn count_of(&self, key: &K) -> Option<u64> {
        self.inner.lock().count_of(key)
    }

    pub fn distinct_keys(&self) -> usize {
        self.inner.lock().distinct_keys()
    }

    /// Runs `f` with exclusive access to the wrapped tracker.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&mut RequestTracker<K, F>) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    pub fn into_inner(self) -> RequestTracker<K, F> {
        self.inner.into_inner()
    }
}
