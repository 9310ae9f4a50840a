#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use topkit::store::segmented::SegmentedMap;

// Fuzz arbitrary operation sequences on SegmentedMap
//
// Tests random sequences of set, get, get_mut and clear against a plain
// HashMap, with a tiny segment capacity so growth happens constantly.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let segment_capacity = usize::from(data[0] % 4) + 1;
    let mut map: SegmentedMap<u8, u32> = SegmentedMap::new(segment_capacity);
    let mut model: HashMap<u8, u32> = HashMap::new();
    let mut max_segments = 1;

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1];
        let value = (u32::from(data[idx]) << 8) | u32::from(key);

        match op {
            0..=3 => {
                // set
                let previous = map.set(key, value).unwrap();
                assert_eq!(previous, model.insert(key, value));
            }
            4 | 5 => {
                // get
                assert_eq!(map.get(&key), model.get(&key));
            }
            6 => {
                // get_mut
                if let Some(v) = map.get_mut(&key) {
                    *v = v.wrapping_add(1);
                    let m = model.get_mut(&key).unwrap();
                    *m = m.wrapping_add(1);
                } else {
                    assert!(!model.contains_key(&key));
                }
            }
            7 => {
                // clear
                map.clear();
                model.clear();
                assert!(map.is_empty());
            }
            _ => unreachable!(),
        }

        assert_eq!(map.len(), model.len());
        assert!(map.segment_count() >= max_segments);
        max_segments = map.segment_count();
        map.check_invariants().unwrap();
        idx += 2;
    }
});
