//! Example demonstrating the hashed sampled-LRU cache under a skewed workload.
//!
//! A small hot set is read constantly while a stream of one-off keys flows
//! through. Two-random-choice eviction keeps most of the hot set resident.
//!
//! Run with: cargo run --example basic_hashed

use sampled_lru::policy::hashed::HashCache;

fn main() {
    println!("=== Hashed Sampled-LRU Cache Example ===\n");

    let capacity = 100;
    let mut cache = HashCache::with_seed(capacity, 7);

    let hot_keys: Vec<u64> = (0..20).collect();
    let mut hits = 0u64;
    let mut lookups = 0u64;

    for step in 0..10_000u64 {
        // one-off key
        cache.insert(1_000 + step, step);

        // every step reads a hot key; insert it back on a miss
        let key = hot_keys[(step % hot_keys.len() as u64) as usize];
        lookups += 1;
        if cache.find(&key).is_some() {
            hits += 1;
        } else {
            cache.insert(key, key);
        }
    }

    println!("Workload: 10,000 one-off inserts, 10,000 hot-set reads");
    println!("  capacity: {}", cache.capacity());
    println!("  len: {}", cache.len());
    println!(
        "  hot-set hit rate: {:.1}%",
        100.0 * hits as f64 / lookups as f64
    );

    let resident = hot_keys.iter().filter(|k| cache.contains(k)).count();
    println!("  hot keys resident at the end: {}/{}", resident, hot_keys.len());

    println!("\n=== Draining By Sampled Eviction ===\n");
    let mut drained = 0;
    while let Some((key, _)) = cache.evict_one() {
        if drained < 5 {
            println!("  evicted {}", key);
        }
        drained += 1;
    }
    println!("  ... {} entries evicted, len = {}", drained, cache.len());
}

// Expected output (exact numbers depend on the seed):
// === Hashed Sampled-LRU Cache Example ===
//
// Workload: 10,000 one-off inserts, 10,000 hot-set reads
//   capacity: 100
//   len: 100
//   hot-set hit rate: [high, well above uniform random eviction]
//   hot keys resident at the end: [most of 20]
//
// === Draining By Sampled Eviction ===
//
//   evicted [varies]
//   ...
