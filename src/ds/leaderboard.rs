//! Bounded, continuously sorted top-N leaderboard.
//!
//! Holds up to `capacity` [`CounterId`]s ordered by descending count. The
//! sequence is fully resorted after every mutation, which keeps the weakest
//! member at the last position. Admission therefore needs a single
//! comparison against that one entry, never a scan.
//!
//! ## Architecture
//!
//! ```text
//!   entries: Vec<CounterId>  (len <= capacity, sorted by count, descending)
//!
//!     [ c7:42 | c3:40 | c9:40 | c1:17 | c4:5 ]
//!                                       ▲
//!                                       └─ minimum, the only admission gate
//!
//!   offer(c):
//!     c.on_leaderboard?          → AlreadyMember   (O(1), no scan)
//!     len < capacity?            → push c          → Admitted
//!     c.count > last.count?      → entries[last] = c, flip both flags
//!                                                  → Replaced
//!     otherwise                  → Rejected
//! ```
//!
//! ## Ordering
//!
//! [`resort`](Leaderboard::resort) uses the standard library's stable sort,
//! which runs in near-linear time on input that is already mostly sorted.
//! Since only the offered counter moved since the previous resort, each call
//! is cheap in practice.
//!
//! Among equal counts the counter that reached the count first keeps the
//! better rank: a counter overtakes a peer only once its count is strictly
//! greater, and a newcomer with an equal count never displaces the minimum.
//!
//! ## Membership flag
//!
//! `Counter::on_leaderboard` is true iff the counter's id is in `entries`.
//! Every path that changes membership here flips the flag in the same call.
//! [`clear`](Leaderboard::clear) deliberately leaves flags alone; it is only
//! meant to run together with clearing the counter arena.
use tracing::trace;

use crate::ds::counter::{CounterArena, CounterId};
use crate::error::InvariantError;

/// One leaderboard position as handed out to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankedEntry<K> {
    pub key: K,
    pub count: u64,
}

/// Outcome of offering a counter to the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The counter was already a member; nothing changed.
    AlreadyMember,
    /// The leaderboard had room; the counter was appended.
    Admitted,
    /// The counter displaced the previous minimum.
    Replaced { evicted: CounterId },
    /// The leaderboard is full and the counter does not beat the minimum.
    Rejected,
}

/// Entries reserved by [`Leaderboard::new`] before any counter is admitted.
const PREALLOCATED_ENTRIES: usize = 1024;

/// Top-N counters by count, kept sorted descending.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<CounterId>,
    capacity: usize,
}

impl Leaderboard {
    /// Creates an empty leaderboard holding at most `capacity` counters.
    ///
    /// Only a bounded prefix is reserved up front; the board grows as counters
    /// are admitted, so an oversized `capacity` costs nothing until it fills.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(PREALLOCATED_ENTRIES)),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Member ids in rank order.
    pub fn ids(&self) -> &[CounterId] {
        &self.entries
    }

    /// Count of the last-ranked member.
    pub fn min_count<K>(&self, counters: &CounterArena<K>) -> Option<u64> {
        self.entries.last().map(|&id| counters.count_of(id))
    }

    /// Admits a freshly created counter if the leaderboard is still filling.
    ///
    /// Unlike [`offer`](Self::offer) this never competes for the last slot:
    /// a new counter has nothing recorded yet.
    pub fn admit_new<K>(&mut self, id: CounterId, counters: &mut CounterArena<K>) -> Admission {
        if self.is_full() {
            return Admission::Rejected;
        }
        match counters.get_mut(id) {
            Some(counter) => {
                counter.set_on_leaderboard(true);
                self.entries.push(id);
                Admission::Admitted
            },
            None => Admission::Rejected,
        }
    }

    /// Offers a counter whose count just changed.
    pub fn offer<K>(&mut self, id: CounterId, counters: &mut CounterArena<K>) -> Admission {
        let count = match counters.get(id) {
            Some(counter) if counter.is_on_leaderboard() => return Admission::AlreadyMember,
            Some(counter) => counter.count(),
            None => return Admission::Rejected,
        };

        if !self.is_full() {
            if let Some(counter) = counters.get_mut(id) {
                counter.set_on_leaderboard(true);
            }
            self.entries.push(id);
            return Admission::Admitted;
        }

        let Some(last) = self.entries.last_mut() else {
            return Admission::Rejected;
        };
        if count <= counters.count_of(*last) {
            return Admission::Rejected;
        }

        let evicted = std::mem::replace(last, id);
        if let Some(counter) = counters.get_mut(evicted) {
            counter.set_on_leaderboard(false);
        }
        if let Some(counter) = counters.get_mut(id) {
            counter.set_on_leaderboard(true);
        }
        trace!(
            admitted = id.index(),
            evicted = evicted.index(),
            count,
            "leaderboard minimum replaced"
        );
        Admission::Replaced { evicted }
    }

    /// Stably re-sorts members by descending count.
    pub fn resort<K>(&mut self, counters: &CounterArena<K>) {
        self.entries
            .sort_by(|a, b| counters.count_of(*b).cmp(&counters.count_of(*a)));
    }

    /// Copies the current ranking out. Later mutations do not affect it.
    pub fn snapshot<K: Clone>(&self, counters: &CounterArena<K>) -> Vec<RankedEntry<K>> {
        self.entries
            .iter()
            .filter_map(|&id| counters.get(id))
            .map(|counter| RankedEntry {
                key: counter.key().clone(),
                count: counter.count(),
            })
            .collect()
    }

    /// Removes every member without touching counter flags.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Verifies bound, ordering and flag/membership agreement against `counters`.
    pub fn check_invariants<K>(&self, counters: &CounterArena<K>) -> Result<(), InvariantError> {
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "leaderboard holds {} entries, capacity is {}",
                self.entries.len(),
                self.capacity
            )));
        }

        let mut member = vec![false; counters.len()];
        let mut previous = u64::MAX;
        for (rank, &id) in self.entries.iter().enumerate() {
            let Some(counter) = counters.get(id) else {
                return Err(InvariantError::new(format!(
                    "rank {rank} refers to dead counter {}",
                    id.index()
                )));
            };
            if member[id.index()] {
                return Err(InvariantError::new(format!(
                    "counter {} appears twice on the leaderboard",
                    id.index()
                )));
            }
            member[id.index()] = true;
            if !counter.is_on_leaderboard() {
                return Err(InvariantError::new(format!(
                    "counter {} is ranked but its flag is clear",
                    id.index()
                )));
            }
            if counter.count() > previous {
                return Err(InvariantError::new(format!(
                    "rank {rank} has count {} above the previous rank's {previous}",
                    counter.count()
                )));
            }
            previous = counter.count();
        }

        for (id, counter) in counters.iter() {
            if counter.is_on_leaderboard() && !member[id.index()] {
                return Err(InvariantError::new(format!(
                    "counter {} is flagged but not ranked",
                    id.index()
                )));
            }
        }
        Ok(())
    }
}
