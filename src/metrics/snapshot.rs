/// Point-in-time copy of tracker counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackerMetricsSnapshot {
    pub events_recorded: u64,
    pub counters_created: u64,

    pub admissions: u64,
    pub replacements: u64,
    pub rejections: u64,
    pub member_skips: u64, // offers short-circuited by the membership flag

    pub segments_allocated: u64,
    pub resets: u64,

    pub top_n_calls: u64,
    pub count_lookups: u64,

    // gauges captured at snapshot time
    pub distinct_keys: usize,
    pub segments: usize,
    pub leaderboard_len: usize,
    pub leaderboard_capacity: usize,
}
