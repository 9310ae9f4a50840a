#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use topkit::builder::TrackerBuilder;

// Fuzz arbitrary operation sequences on RequestTracker
//
// The first two bytes pick the leaderboard size and segment capacity; the rest
// drive record, top_n, count_of and reset. A shadow HashMap holds the exact
// counts, and the tracker's invariants are checked after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let top_n = usize::from(data[0] % 16) + 1;
    let segment_capacity = usize::from(data[1] % 8) + 1;
    let mut tracker = TrackerBuilder::new(top_n)
        .segment_capacity(segment_capacity)
        .build::<u8>();
    let mut model: HashMap<u8, u64> = HashMap::new();

    let mut idx = 2;
    while idx + 1 < data.len() {
        let op = data[idx] % 16;
        let key = data[idx + 1] % 64;

        match op {
            0..=11 => {
                // record
                tracker.record(key).unwrap();
                *model.entry(key).or_insert(0) += 1;
                assert_eq!(tracker.count_of(&key), model.get(&key).copied());
            }
            12 | 13 => {
                // top_n
                let top = tracker.top_n();
                assert_eq!(top.len(), model.len().min(top_n));
                assert!(top.windows(2).all(|pair| pair[0].count >= pair[1].count));
                if let Some(min) = top.last().map(|entry| entry.count) {
                    for (k, &count) in &model {
                        if !top.iter().any(|entry| entry.key == *k) {
                            assert!(count <= min);
                        }
                    }
                }
            }
            14 => {
                // count_of
                assert_eq!(tracker.count_of(&key), model.get(&key).copied());
            }
            15 => {
                // reset
                tracker.reset();
                model.clear();
                assert!(tracker.top_n().is_empty());
                assert_eq!(tracker.distinct_keys(), 0);
            }
            _ => unreachable!(),
        }

        tracker.check_invariants().unwrap();
        idx += 2;
    }
});
