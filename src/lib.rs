//! topkit: per-key event counting with an incrementally maintained top-N
//! leaderboard.
//!
//! The crate has two cooperating halves:
//!
//! - [`store::SegmentedMap`]: a key/value map built from fixed-capacity
//!   segments that allocates another segment when one fills, so the key
//!   space has no ceiling.
//! - [`ds::Leaderboard`]: the top-N counters, kept sorted after every event
//!   and guarded by an O(1) membership flag on each counter.
//!
//! [`tracker::RequestTracker`] combines them behind `record`, `top_n` and
//! `reset`. See [`builder::TrackerBuilder`] for configuration.

pub mod builder;
pub mod ds;
pub mod error;
pub mod prelude;
pub mod store;
pub mod tracker;

#[cfg(feature = "metrics")]
pub mod metrics;
