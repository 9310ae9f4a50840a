mod common;

use std::hint::black_box;
use std::net::Ipv4Addr;

use common::workload::{Workload, WorkloadSpec};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use topkit::store::segmented::SegmentedMap;

const KEYS: usize = 200_000;

/// Cost of spreading the same key set over more, smaller segments.
fn bench_insert_by_segment_capacity(c: &mut Criterion) {
    let keys = WorkloadSpec {
        universe: KEYS as u32,
        workload: Workload::Distinct,
        seed: 0,
    }
    .keys(KEYS);

    let mut group = c.benchmark_group("segmented_insert");
    group.throughput(Throughput::Elements(KEYS as u64));
    for capacity in [KEYS, KEYS / 4, KEYS / 16] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let mut map: SegmentedMap<Ipv4Addr, u32> = SegmentedMap::new(capacity);
                for (i, &key) in keys.iter().enumerate() {
                    let _ = map.set(key, i as u32);
                }
                black_box(map.segment_count())
            })
        });
    }
    group.finish();
}

fn bench_lookup_by_segment_capacity(c: &mut Criterion) {
    let keys = WorkloadSpec {
        universe: KEYS as u32,
        workload: Workload::Distinct,
        seed: 0,
    }
    .keys(KEYS);

    let mut group = c.benchmark_group("segmented_get");
    group.throughput(Throughput::Elements(KEYS as u64));
    for capacity in [KEYS, KEYS / 4, KEYS / 16] {
        let mut map: SegmentedMap<Ipv4Addr, u32> = SegmentedMap::new(capacity);
        for (i, &key) in keys.iter().enumerate() {
            let _ = map.set(key, i as u32);
        }
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &map, |b, map| {
            b.iter(|| {
                for key in &keys {
                    black_box(map.get(black_box(key)));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert_by_segment_capacity, bench_lookup_by_segment_capacity);
criterion_main!(benches);
