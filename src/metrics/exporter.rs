use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::TrackerMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for tracker metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer, e.g. to read back a `Vec<u8>` buffer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: usize) {
        self.write_metric("gauge", &self.metric_name(suffix), value as u64);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<TrackerMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TrackerMetricsSnapshot) {
        self.write_counter("events_recorded_total", snapshot.events_recorded);
        self.write_counter("counters_created_total", snapshot.counters_created);
        self.write_counter("leaderboard_admissions_total", snapshot.admissions);
        self.write_counter("leaderboard_replacements_total", snapshot.replacements);
        self.write_counter("leaderboard_rejections_total", snapshot.rejections);
        self.write_counter("leaderboard_member_skips_total", snapshot.member_skips);
        self.write_counter("segments_allocated_total", snapshot.segments_allocated);
        self.write_counter("resets_total", snapshot.resets);
        self.write_counter("top_n_calls_total", snapshot.top_n_calls);
        self.write_counter("count_lookups_total", snapshot.count_lookups);
        self.write_gauge("distinct_keys", snapshot.distinct_keys);
        self.write_gauge("segments", snapshot.segments);
        self.write_gauge("leaderboard_len", snapshot.leaderboard_len);
        self.write_gauge("leaderboard_capacity", snapshot.leaderboard_capacity);
    }
}
