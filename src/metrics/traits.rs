//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting*, and *export* so the tracker's hot
//! path only bumps counters and never knows who consumes them.
//!
//! ```text
//!   ┌──────────────────────────────┐   ┌──────────────────────────────┐
//!   │ TrackerMetricsRecorder       │   │ TrackerMetricsReadRecorder   │
//!   │ (&mut self: record/reset)    │   │ (&self: top_n/count_of)      │
//!   └──────────────┬───────────────┘   └──────────────┬───────────────┘
//!                  └───────────────┬──────────────────┘
//!                                  ▼
//!                       ┌─────────────────────┐
//!                       │   TrackerMetrics    │
//!                       └──────────┬──────────┘
//!                                  │ snapshot
//!             ┌────────────────────┴────────────────────┐
//!             ▼                                         ▼
//!   MetricsSnapshotProvider<S> (bench/test)   MetricsExporter<S> (monitoring)
//! ```

use crate::ds::leaderboard::Admission;

/// Counters bumped by mutating tracker operations.
pub trait TrackerMetricsRecorder {
    fn record_event(&mut self);
    fn record_counter_created(&mut self);
    fn record_admission(&mut self, admission: Admission);
    fn record_segment_allocated(&mut self);
    fn record_reset(&mut self);
}

/// Counters bumped by read-only tracker operations (interior mutability).
pub trait TrackerMetricsReadRecorder {
    fn record_top_n_call(&self);
    fn record_count_lookup(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
