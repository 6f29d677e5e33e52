//! Example demonstrating the ordered sampled-LRU cache.
//!
//! When the cache is full, two entries are drawn at random and the one used
//! less recently is evicted. Recently used keys therefore survive far more
//! often than keys nobody touches.
//!
//! Run with: cargo run --example basic_ordered

use sampled_lru::policy::ordered::OrderedCache;

fn main() {
    println!("=== Ordered Sampled-LRU Cache Example ===\n");

    // Fixed seed so the output is reproducible
    let mut cache = OrderedCache::with_seed(10, 42);
    println!("Created ordered cache: capacity={}\n", cache.capacity());

    for i in 1..=10 {
        cache.insert(i, format!("value-{}", i));
    }
    println!("Inserted keys 1-10");
    println!("  len: {}", cache.len());

    // Keep keys 1-3 hot
    for key in 1..=3 {
        cache.find(&key);
    }
    println!("\nLooked up keys 1-3 (refreshes their recency)");
    for key in 1..=4 {
        println!("  last_access({}) = {:?}", key, cache.last_access(&key));
    }

    println!("\nInserting keys 11-15 (triggers 5 sampled evictions)...");
    for i in 11..=15 {
        cache.insert(i, format!("value-{}", i));
    }

    let hot: Vec<_> = (1..=3).filter(|k| cache.contains(k)).collect();
    let cold: Vec<_> = (4..=10).filter(|k| cache.contains(k)).collect();
    println!("\nAfter insertions:");
    println!("  len: {}", cache.len());
    println!("  hot survivors (1-3): {:?}", hot);
    println!("  cold survivors (4-10): {:?}", cold);

    // Iteration follows key order for this variant
    println!("\n=== Key-Ordered Iteration ===\n");
    for (key, value) in cache.iter() {
        println!("  {} -> {}", key, value);
    }

    println!("\n=== Explicit Removal ===\n");
    println!("  evict_key(11) = {:?}", cache.evict_key(&11));
    println!("  evict_key(11) again = {:?}", cache.evict_key(&11));
    cache.evict();
    println!("  after one evict(): len = {}", cache.len());

    cache.clear();
    println!("  after clear(): len = {}", cache.len());
}

// Expected output (survivor lists depend on the seed):
// === Ordered Sampled-LRU Cache Example ===
//
// Created ordered cache: capacity=10
//
// Inserted keys 1-10
//   len: 10
//
// Looked up keys 1-3 (refreshes their recency)
//   last_access(1) = Some(10)
//   last_access(2) = Some(11)
//   last_access(3) = Some(12)
//   last_access(4) = Some(3)
//
// Inserting keys 11-15 (triggers 5 sampled evictions)...
//
// After insertions:
//   len: 10
//   hot survivors (1-3): [varies, usually all three]
//   cold survivors (4-10): [varies]
// ...
