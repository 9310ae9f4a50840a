pub mod counter;
pub mod leaderboard;

pub use counter::{Counter, CounterArena, CounterId};
pub use leaderboard::{Admission, Leaderboard, RankedEntry};
