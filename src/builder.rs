//! Tracker configuration.
//!
//! [`TrackerBuilder`] collects the two knobs a tracker has, the leaderboard
//! size and the per-segment key capacity, and validates them once.
//!
//! ## Example
//!
//! ```rust
//! use topkit::builder::TrackerBuilder;
//!
//! let mut tracker = TrackerBuilder::new(100)
//!     .segment_capacity(1 << 20)
//!     .build::<String>();
//! tracker.record("10.0.0.1".to_string()).unwrap();
//! assert_eq!(tracker.top_n()[0].count, 1);
//! ```

use std::hash::Hash;

use crate::ds::counter::CounterId;
use crate::error::ConfigError;
use crate::store::hashmap::HashMapStoreFactory;
use crate::store::segmented::SegmentedMap;
use crate::store::traits::StoreFactory;
use crate::tracker::RequestTracker;

/// Leaderboard size used by [`TrackerBuilder::default`].
pub const DEFAULT_TOP_N: usize = 100;

/// Keys per map segment unless configured otherwise (2^24).
pub const DEFAULT_SEGMENT_CAPACITY: usize = 1 << 24;

/// Builder for [`RequestTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerBuilder {
    top_n: usize,
    segment_capacity: usize,
}

impl TrackerBuilder {
    /// Starts a builder ranking the top `top_n` keys.
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
        }
    }

    /// Sets how many distinct keys one map segment holds before another is used.
    pub fn segment_capacity(mut self, segment_capacity: usize) -> Self {
        self.segment_capacity = segment_capacity;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::new("top_n must be > 0"));
        }
        if self.segment_capacity == 0 {
            return Err(ConfigError::new("segment_capacity must be > 0"));
        }
        Ok(())
    }

    /// Builds a tracker with the default hash-map segments.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; see [`try_build`](Self::try_build).
    pub fn build<K>(self) -> RequestTracker<K>
    where
        K: Eq + Hash + Clone,
    {
        self.build_with_factory(HashMapStoreFactory::default())
    }

    /// Builds a tracker with the default hash-map segments.
    pub fn try_build<K>(self) -> Result<RequestTracker<K>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        self.try_build_with_factory(HashMapStoreFactory::default())
    }

    /// Builds a tracker whose key index allocates segments with `factory`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn build_with_factory<K, F>(self, factory: F) -> RequestTracker<K, F>
    where
        K: Eq + Hash + Clone,
        F: StoreFactory<K, CounterId>,
    {
        match self.try_build_with_factory(factory) {
            Ok(tracker) => tracker,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`build_with_factory`](Self::build_with_factory).
    pub fn try_build_with_factory<K, F>(self, factory: F) -> Result<RequestTracker<K, F>, ConfigError>
    where
        K: Eq + Hash + Clone,
        F: StoreFactory<K, CounterId>,
    {
        self.validate()?;
        let index = SegmentedMap::try_with_factory(self.segment_capacity, factory)?;
        Ok(RequestTracker::from_parts(index, self.top_n))
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::RandomState;

    use super::*;

    #[test]
    fn defaults() {
        let builder = TrackerBuilder::default();
        assert_eq!(builder.top_n(), DEFAULT_TOP_N);
        let tracker = builder.build::<u32>();
        assert_eq!(tracker.leaderboard_capacity(), 100);
        assert_eq!(tracker.segment_capacity(), DEFAULT_SEGMENT_CAPACITY);
        assert_eq!(tracker.segment_count(), 1);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let err = TrackerBuilder::new(0).try_build::<u32>().unwrap_err();
        assert!(err.message().contains("top_n"));
    }

    #[test]
    fn zero_segment_capacity_is_rejected() {
        let err = TrackerBuilder::new(5)
            .segment_capacity(0)
            .try_build::<u32>()
            .unwrap_err();
        assert!(err.message().contains("segment_capacity"));
    }

    #[test]
    #[should_panic(expected = "top_n must be > 0")]
    fn build_panics_on_invalid_config() {
        let _ = TrackerBuilder::new(0).build::<u32>();
    }

    #[test]
    fn custom_hasher_factory() {
        let mut tracker = TrackerBuilder::new(2)
            .segment_capacity(2)
            .build_with_factory::<u32, _>(HashMapStoreFactory::with_hasher(RandomState::new()));
        for key in 0..5 {
            tracker.record(key).unwrap();
        }
        assert_eq!(tracker.segment_count(), 3);
        assert_eq!(tracker.distinct_keys(), 5);
    }

    #[test]
    fn huge_top_n_builds_without_preallocating() {
        let mut tracker = TrackerBuilder::new(usize::MAX / 16)
            .try_build::<u32>()
            .unwrap();
        assert_eq!(tracker.leaderboard_capacity(), usize::MAX / 16);
        for key in 0..10 {
            tracker.record(key).unwrap();
        }
        assert_eq!(tracker.top_n().len(), 10);
        tracker.check_invariants().unwrap();
    }
}
