// ==============================================
// REQUEST TRACKER INVARIANT TESTS (integration)
// ==============================================
//
// Checks the public tracker API against a brute-force model: every key is
// counted exactly, the ranking is the true top-N, membership flags agree with
// the leaderboard, and reset/snapshot/overflow behave as documented.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use proptest::prelude::*;
use topkit::builder::TrackerBuilder;
use topkit::ds::RankedEntry;
use topkit::tracker::RequestTracker;

#[derive(Debug, Clone)]
enum Op {
    Record(u8),
    TopN,
    Reset,
}

fn op_strategy(universe: u8) -> impl Strategy<Value = Op> {
    prop_oneof![
        30 => (0..universe).prop_map(Op::Record),
        3 => Just(Op::TopN),
        1 => Just(Op::Reset),
    ]
}

/// Asserts that `top` is exactly a valid top-N of `model`.
fn assert_true_top_n(top: &[RankedEntry<u8>], model: &HashMap<u8, u64>, n: usize) {
    assert_eq!(top.len(), model.len().min(n));

    for pair in top.windows(2) {
        assert!(pair[0].count >= pair[1].count, "ranking not descending: {top:?}");
    }
    for entry in top {
        assert_eq!(model.get(&entry.key), Some(&entry.count));
    }
    if let Some(min) = top.last().map(|entry| entry.count) {
        for (key, &count) in model {
            if !top.iter().any(|entry| entry.key == *key) {
                assert!(
                    count <= min,
                    "unranked key {key} has count {count} above ranked minimum {min}"
                );
            }
        }
    }
}

fn record_times<K: Eq + std::hash::Hash + Clone>(tracker: &mut RequestTracker<K>, key: K, times: usize) {
    for _ in 0..times {
        tracker.record(key.clone()).unwrap();
    }
}

// ==============================================
// Reference scenario
// ==============================================

#[test]
fn reference_scenario_top_three() {
    let mut tracker = TrackerBuilder::new(3).build::<&str>();
    record_times(&mut tracker, "1.1.1.1", 1);
    record_times(&mut tracker, "2.2.2.2", 2);
    record_times(&mut tracker, "3.3.3.3", 3);
    record_times(&mut tracker, "4.4.4.4", 1);

    let top: Vec<_> = tracker
        .top_n()
        .into_iter()
        .map(|entry| (entry.key, entry.count))
        .collect();
    assert_eq!(
        top,
        vec![("3.3.3.3", 3), ("2.2.2.2", 2), ("1.1.1.1", 1)]
    );
    tracker.check_invariants().unwrap();
}

#[test]
fn tied_newcomer_does_not_displace_earlier_key() {
    let mut tracker = TrackerBuilder::new(2).build::<Ipv4Addr>();
    let first = Ipv4Addr::new(10, 0, 0, 1);
    let second = Ipv4Addr::new(10, 0, 0, 2);
    let late = Ipv4Addr::new(10, 0, 0, 3);

    record_times(&mut tracker, first, 2);
    record_times(&mut tracker, second, 1);
    record_times(&mut tracker, late, 1);

    assert!(tracker.is_ranked(&second));
    assert!(!tracker.is_ranked(&late));

    record_times(&mut tracker, late, 1);
    assert!(tracker.is_ranked(&late));
    assert!(!tracker.is_ranked(&second));
    tracker.check_invariants().unwrap();
}

#[test]
fn default_tracker_ranks_one_hundred() {
    let mut tracker = TrackerBuilder::default().build::<u32>();
    for key in 0..250u32 {
        record_times(&mut tracker, key, (key % 7) as usize + 1);
    }
    let top = tracker.top_n();
    assert_eq!(top.len(), 100);
    assert!(top.iter().all(|entry| entry.count >= top[99].count));
    tracker.check_invariants().unwrap();
}

// ==============================================
// Overflow transparency
// ==============================================

#[test]
fn more_keys_than_one_segment_holds() {
    let capacity = 64;
    let extra = 100;
    let mut tracker = TrackerBuilder::new(10)
        .segment_capacity(capacity)
        .build::<u32>();

    for key in 0..(capacity + extra) as u32 {
        tracker.record(key).unwrap();
    }

    assert_eq!(tracker.distinct_keys(), capacity + extra);
    assert_eq!(tracker.segment_count(), 3);
    for key in 0..(capacity + extra) as u32 {
        assert_eq!(tracker.count_of(&key), Some(1));
    }
    tracker.check_invariants().unwrap();
}

// ==============================================
// Property tests
// ==============================================

proptest! {
    /// Property: tracker agrees with a brute-force model after every operation
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_matches_brute_force_model(
        top_n in 1usize..6,
        segment_capacity in 1usize..5,
        ops in prop::collection::vec(op_strategy(16), 0..200)
    ) {
        let mut tracker = TrackerBuilder::new(top_n)
            .segment_capacity(segment_capacity)
            .build::<u8>();
        let mut model: HashMap<u8, u64> = HashMap::new();

        for op in ops {
            match op {
                Op::Record(key) => {
                    tracker.record(key).unwrap();
                    *model.entry(key).or_insert(0) += 1;
                },
                Op::TopN => {
                    assert_true_top_n(&tracker.top_n(), &model, top_n);
                },
                Op::Reset => {
                    tracker.reset();
                    model.clear();
                    prop_assert!(tracker.top_n().is_empty());
                },
            }

            prop_assert_eq!(tracker.distinct_keys(), model.len());
            for (key, &count) in &model {
                prop_assert_eq!(tracker.count_of(key), Some(count));
            }
            prop_assert!(tracker.check_invariants().is_ok());
        }

        assert_true_top_n(&tracker.top_n(), &model, top_n);
    }

    /// Property: top_n() never returns more than N entries
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_top_n_bounded(
        top_n in 1usize..8,
        keys in prop::collection::vec(any::<u16>(), 0..300)
    ) {
        let mut tracker = TrackerBuilder::new(top_n).segment_capacity(8).build::<u16>();
        for key in keys {
            tracker.record(key).unwrap();
            prop_assert!(tracker.top_n().len() <= top_n);
            prop_assert!(tracker.leaderboard_len() <= top_n);
        }
    }

    /// Property: ranked flag is set exactly for keys returned by top_n()
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_ranked_flag_matches_snapshot(
        keys in prop::collection::vec(0u8..32, 1..200)
    ) {
        let mut tracker = TrackerBuilder::new(4).segment_capacity(3).build::<u8>();
        for key in keys {
            tracker.record(key).unwrap();
            let top = tracker.top_n();
            for candidate in 0u8..32 {
                let listed = top.iter().any(|entry| entry.key == candidate);
                prop_assert_eq!(tracker.is_ranked(&candidate), listed);
            }
        }
    }

    /// Property: counts restart at one after reset
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_reset_restarts_counts(
        keys in prop::collection::vec(0u8..8, 1..100)
    ) {
        let mut tracker = TrackerBuilder::new(3).segment_capacity(2).build::<u8>();
        for &key in &keys {
            tracker.record(key).unwrap();
        }
        tracker.reset();
        prop_assert!(tracker.top_n().is_empty());

        let key = keys[0];
        tracker.record(key).unwrap();
        prop_assert_eq!(tracker.count_of(&key), Some(1));
        prop_assert_eq!(tracker.top_n(), vec![RankedEntry { key, count: 1 }]);
    }

    /// Property: a snapshot never changes after further events
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_snapshot_independent(
        before in prop::collection::vec(0u8..10, 0..50),
        after in prop::collection::vec(0u8..10, 1..50)
    ) {
        let mut tracker = TrackerBuilder::new(3).build::<u8>();
        tracker.record_many(before).unwrap();
        let snapshot = tracker.top_n();
        let copy = snapshot.clone();

        tracker.record_many(after).unwrap();
        prop_assert_eq!(snapshot, copy);
    }

    /// Property: capacity + k distinct keys are all retrievable
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_overflow_keeps_all_keys(
        segment_capacity in 1usize..16,
        extra in 1usize..64
    ) {
        let total = segment_capacity + extra;
        let mut tracker = TrackerBuilder::new(5)
            .segment_capacity(segment_capacity)
            .build::<usize>();
        for key in 0..total {
            tracker.record(key).unwrap();
        }
        prop_assert_eq!(tracker.distinct_keys(), total);
        prop_assert_eq!(tracker.segment_count(), total.div_ceil(segment_capacity));
        for key in 0..total {
            prop_assert_eq!(tracker.count_of(&key), Some(1));
        }
    }
}
