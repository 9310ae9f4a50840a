use std::sync::atomic::{AtomicU64, Ordering};

use crate::ds::leaderboard::Admission;
use crate::metrics::snapshot::TrackerMetricsSnapshot;
use crate::metrics::traits::{TrackerMetricsReadRecorder, TrackerMetricsRecorder};

#[derive(Debug, Default)]
pub struct TrackerMetrics {
    pub events_recorded: u64,
    pub counters_created: u64,
    pub admissions: u64,
    pub replacements: u64,
    pub rejections: u64,
    pub member_skips: u64,
    pub segments_allocated: u64,
    pub resets: u64,
    pub top_n_calls: AtomicU64,
    pub count_lookups: AtomicU64,
}

impl TrackerMetrics {
    /// Copies counters into a snapshot; gauges are left for the caller.
    pub fn counters_snapshot(&self) -> TrackerMetricsSnapshot {
        TrackerMetricsSnapshot {
            events_recorded: self.events_recorded,
            counters_created: self.counters_created,
            admissions: self.admissions,
            replacements: self.replacements,
            rejections: self.rejections,
            member_skips: self.member_skips,
            segments_allocated: self.segments_allocated,
            resets: self.resets,
            top_n_calls: self.top_n_calls.load(Ordering::Relaxed),
            count_lookups: self.count_lookups.load(Ordering::Relaxed),
            ..TrackerMetricsSnapshot::default()
        }
    }
}

impl TrackerMetricsRecorder for TrackerMetrics {
    fn record_event(&mut self) {
        self.events_recorded += 1;
    }

    fn record_counter_created(&mut self) {
        self.counters_created += 1;
    }

    fn record_admission(&mut self, admission: Admission) {
        match admission {
            Admission::AlreadyMember => self.member_skips += 1,
            Admission::Admitted => self.admissions += 1,
            Admission::Replaced { .. } => self.replacements += 1,
            Admission::Rejected => self.rejections += 1,
        }
    }

    fn record_segment_allocated(&mut self) {
        self.segments_allocated += 1;
    }

    fn record_reset(&mut self) {
        self.resets += 1;
    }
}

impl TrackerMetricsReadRecorder for TrackerMetrics {
    fn record_top_n_call(&self) {
        self.top_n_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn record_count_lookup(&self) {
        self.count_lookups.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::counter::CounterArena;

    #[test]
    fn admissions_are_bucketed_by_outcome() {
        let mut arena = CounterArena::new();
        let evicted = arena.insert(0u8);
        let mut metrics = TrackerMetrics::default();
        metrics.record_admission(Admission::Admitted);
        metrics.record_admission(Admission::AlreadyMember);
        metrics.record_admission(Admission::AlreadyMember);
        metrics.record_admission(Admission::Replaced { evicted });
        metrics.record_admission(Admission::Rejected);

        let snapshot = metrics.counters_snapshot();
        assert_eq!(snapshot.admissions, 1);
        assert_eq!(snapshot.member_skips, 2);
        assert_eq!(snapshot.replacements, 1);
        assert_eq!(snapshot.rejections, 1);
    }

    #[test]
    fn read_recorders_work_through_shared_ref() {
        let metrics = TrackerMetrics::default();
        metrics.record_top_n_call();
        metrics.record_count_lookup();
        metrics.record_count_lookup();
        let snapshot = metrics.counters_snapshot();
        assert_eq!(snapshot.top_n_calls, 1);
        assert_eq!(snapshot.count_lookups, 2);
    }
}
