//! DHAT heap profiler for topkit.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::net::Ipv4Addr;

use topkit::builder::TrackerBuilder;
use topkit::tracker::RequestTracker;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_ip(&mut self) -> Ipv4Addr {
        Ipv4Addr::from(self.next_u64() as u32)
    }
}

/// Many distinct addresses, a few requests each: exercises segment growth.
fn wide_workload(tracker: &mut RequestTracker<Ipv4Addr>, addresses: usize, per_address: usize, seed: u64) {
    let mut rng = XorShift64::new(seed);
    for _ in 0..addresses {
        let ip = rng.next_ip();
        for _ in 0..per_address {
            let _ = tracker.record(ip);
        }
    }
}

/// Few addresses, heavy repetition: exercises the leaderboard resort path.
fn hot_workload(tracker: &mut RequestTracker<Ipv4Addr>, operations: usize, hot: u64, seed: u64) {
    let mut rng = XorShift64::new(seed);
    for _ in 0..operations {
        let ip = Ipv4Addr::from((rng.next_u64() % hot) as u32);
        let _ = tracker.record(ip);
    }
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("Running DHAT heap profile...");

    let mut tracker = TrackerBuilder::new(100)
        .segment_capacity(1 << 16)
        .build::<Ipv4Addr>();

    println!("  wide workload (250k addresses x 4 requests)");
    wide_workload(&mut tracker, 250_000, 4, 42);
    println!(
        "    distinct keys: {}, segments: {}",
        tracker.distinct_keys(),
        tracker.segment_count()
    );

    println!("  reset");
    tracker.reset();

    println!("  hot workload (1M requests over 10k addresses)");
    hot_workload(&mut tracker, 1_000_000, 10_000, 7);

    let top = tracker.top_n();
    if let Some(first) = top.first() {
        println!("    top address: {} ({} requests)", first.key, first.count);
    }

    println!("\nProfile complete. Results written to dhat-heap.json");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
