//! Example demonstrating runtime backing selection with `CacheBuilder`.
//!
//! Set `RUST_LOG=sampled_lru=trace` to see every sampled eviction.
//!
//! Run with: cargo run --example basic_builder

use sampled_lru::builder::{Backing, CacheBuilder, CacheConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sampled_lru=debug")),
        )
        .init();

    println!("=== CacheBuilder Example ===\n");

    for backing in [Backing::Ordered, Backing::Hash] {
        let mut cache = CacheBuilder::new(4)
            .backing(backing)
            .seed(2024)
            .build::<&str, u32>();

        for (i, word) in ["alpha", "beta", "gamma", "delta"].into_iter().enumerate() {
            cache.insert(word, i as u32);
        }
        cache.find(&"alpha");
        cache.insert("epsilon", 4);

        println!("{:?} backing:", cache.backing());
        println!("  len: {}", cache.len());
        println!("  alpha kept: {}", cache.contains(&"alpha"));
        println!("  epsilon kept: {}", cache.contains(&"epsilon"));
        println!();
    }

    println!("=== Configuration Errors ===\n");
    let config = CacheConfig {
        capacity: 0,
        ..CacheConfig::default()
    };
    match CacheBuilder::from_config(config).try_build::<u64, u64>() {
        Ok(_) => println!("  unexpected: zero capacity accepted"),
        Err(err) => println!("  rejected: {}", err),
    }
}

// Expected output (with the default log filter, log lines omitted):
// === CacheBuilder Example ===
//
// Ordered backing:
//   len: 4
//   alpha kept: true
//   epsilon kept: true
//
// Hash backing:
//   len: 4
//   alpha kept: true
//   epsilon kept: true
//
// === Configuration Errors ===
//
//   rejected: cache capacity must be greater than zero
