//! Per-key counters and the arena that owns them.
//!
//! Every distinct key gets exactly one [`Counter`], stored once in a
//! [`CounterArena`]. The key index and the leaderboard both refer to it
//! through a copyable [`CounterId`], so membership on the leaderboard never
//! duplicates counter state.
//!
//! ## Architecture
//!
//! ```text
//!   key index: K -> CounterId        leaderboard: [CounterId; <= N]
//!          │                                  │
//!          └──────────────┐      ┌────────────┘
//!                         ▼      ▼
//!   arena: Vec<Counter<K>>   [ c0 | c1 | c2 | ... ]
//!                              key, count, on_leaderboard
//! ```
//!
//! Counters are only ever appended. The arena is emptied as a whole by
//! [`CounterArena::clear`], which invalidates every outstanding id.

/// Stable handle to a [`Counter`] inside a [`CounterArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterId(usize);

impl CounterId {
    /// Returns the raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Occurrence count for one key.
///
/// `count` only grows and saturates at `u64::MAX`. The `on_leaderboard`
/// flag mirrors leaderboard membership and is written only by
/// [`Leaderboard`](crate::ds::leaderboard::Leaderboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter<K> {
    key: K,
    count: u64,
    on_leaderboard: bool,
}

impl<K> Counter<K> {
    /// Creates a counter at zero, off the leaderboard.
    pub fn new(key: K) -> Self {
        Self {
            key,
            count: 0,
            on_leaderboard: false,
        }
    }

    /// The key this counter belongs to.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Occurrences recorded since creation.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the counter is currently on the leaderboard.
    #[inline]
    pub fn is_on_leaderboard(&self) -> bool {
        self.on_leaderboard
    }

    /// Adds one occurrence.
    #[inline]
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    #[inline]
    pub(crate) fn set_on_leaderboard(&mut self, on_leaderboard: bool) {
        self.on_leaderboard = on_leaderboard;
    }
}

/// Append-only storage for counters.
#[derive(Debug, Clone)]
pub struct CounterArena<K> {
    counters: Vec<Counter<K>>,
}

impl<K> CounterArena<K> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            counters: Vec::new(),
        }
    }

    /// Id the next [`insert`](Self::insert) will return.
    #[inline]
    pub fn next_id(&self) -> CounterId {
        CounterId(self.counters.len())
    }

    /// Stores a fresh counter for `key` and returns its id.
    pub fn insert(&mut self, key: K) -> CounterId {
        let id = CounterId(self.counters.len());
        self.counters.push(Counter::new(key));
        id
    }

    /// Returns the counter for `id`, if it is live.
    pub fn get(&self, id: CounterId) -> Option<&Counter<K>> {
        self.counters.get(id.0)
    }

    /// Returns the counter for `id` mutably, if it is live.
    pub fn get_mut(&mut self, id: CounterId) -> Option<&mut Counter<K>> {
        self.counters.get_mut(id.0)
    }

    /// Count for `id`, or zero for a dead id.
    #[inline]
    pub fn count_of(&self, id: CounterId) -> u64 {
        self.get(id).map_or(0, Counter::count)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Iterates over `(id, counter)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (CounterId, &Counter<K>)> {
        self.counters
            .iter()
            .enumerate()
            .map(|(idx, counter)| (CounterId(idx), counter))
    }

    /// Drops every counter. All previously issued ids become dead.
    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

impl<K> Default for CounterArena<K> {
    fn default() -> Self {
        Self::new()
    }
}
