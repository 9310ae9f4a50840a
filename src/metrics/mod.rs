//! Tracker metrics (feature `metrics`).
//!
//! Recording, snapshotting and export are split into small traits, see
//! [`traits`]. [`RequestTracker`](crate::tracker::RequestTracker) records into
//! a [`metrics_impl::TrackerMetrics`] and exposes a
//! [`snapshot::TrackerMetricsSnapshot`] through
//! [`traits::MetricsSnapshotProvider`].

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
