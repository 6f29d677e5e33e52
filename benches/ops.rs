//! Micro-operation benchmarks for both cache variants.
//!
//! Run with: `cargo bench --bench ops`
//!
//! Measures per-operation latency for lookups, inserts that miss, and
//! explicit evictions under identical conditions.

use std::hint::black_box;
use std::time::Instant;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sampled_lru::policy::hashed::HashCache;
use sampled_lru::policy::ordered::OrderedCache;

const CAPACITY: usize = 16_384;
const OPS: u64 = 100_000;

// ============================================================================
// Find Hit Latency (ns/op)
// ============================================================================

fn bench_find_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_hit_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("ordered", |b| {
        b.iter_custom(|iters| {
            let mut cache = OrderedCache::with_seed(CAPACITY, 1);
            for i in 0..CAPACITY as u64 {
                cache.insert(i, i);
            }
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    let key = i % (CAPACITY as u64);
                    black_box(cache.find(&key));
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("hashed", |b| {
        b.iter_custom(|iters| {
            let mut cache = HashCache::with_seed(CAPACITY, 1);
            for i in 0..CAPACITY as u64 {
                cache.insert(i, i);
            }
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    let key = i % (CAPACITY as u64);
                    black_box(cache.find(&key));
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Insert Miss Latency (ns/op), every insert evicts
// ============================================================================

fn bench_insert_evicting(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_evicting_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("ordered", |b| {
        b.iter_custom(|iters| {
            let mut cache = OrderedCache::with_seed(CAPACITY, 2);
            for i in 0..CAPACITY as u64 {
                cache.insert(i, i);
            }
            let mut next = CAPACITY as u64;
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS {
                    cache.insert(black_box(next), next);
                    next += 1;
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("hashed", |b| {
        b.iter_custom(|iters| {
            let mut cache = HashCache::with_seed(CAPACITY, 2);
            for i in 0..CAPACITY as u64 {
                cache.insert(i, i);
            }
            let mut next = CAPACITY as u64;
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS {
                    cache.insert(black_box(next), next);
                    next += 1;
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Fill Then Drain, by capacity
// ============================================================================

fn bench_fill_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_drain");

    for capacity in [64usize, 1024, CAPACITY] {
        group.throughput(Throughput::Elements(capacity as u64));

        group.bench_with_input(BenchmarkId::new("ordered", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut cache = OrderedCache::with_seed(cap, 3);
                for i in 0..cap as u64 {
                    cache.insert(i, i);
                }
                while let Some(pair) = cache.evict_one() {
                    black_box(pair);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("hashed", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut cache = HashCache::with_seed(cap, 3);
                for i in 0..cap as u64 {
                    cache.insert(i, i);
                }
                while let Some(pair) = cache.evict_one() {
                    black_box(pair);
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_hit, bench_insert_evicting, bench_fill_drain);
criterion_main!(benches);
