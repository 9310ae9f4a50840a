pub use crate::builder::{DEFAULT_SEGMENT_CAPACITY, DEFAULT_TOP_N, TrackerBuilder};
pub use crate::ds::{Admission, Counter, CounterArena, CounterId, Leaderboard, RankedEntry};
pub use crate::error::{ConfigError, InvariantError, StoreError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::TrackerMetricsSnapshot;
pub use crate::store::{
    HashMapStore, HashMapStoreFactory, InsertError, SegmentedMap, StoreCore, StoreFactory,
    StoreMut,
};
#[cfg(feature = "concurrency")]
pub use crate::tracker::ConcurrentRequestTracker;
pub use crate::tracker::RequestTracker;
