pub mod hashmap;
pub mod segmented;
pub mod traits;

pub use hashmap::{HashMapStore, HashMapStoreFactory};
pub use segmented::SegmentedMap;
pub use traits::{InsertError, StoreCore, StoreFactory, StoreMetrics, StoreMut};
