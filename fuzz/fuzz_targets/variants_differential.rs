#![no_main]

use libfuzzer_sys::fuzz_target;
use sampled_lru::policy::hashed::HashCache;
use sampled_lru::policy::ordered::OrderedCache;

// Run the same operations against both variants with one seed.
//
// They keep identical dense indexes, so every lookup, clock value, and
// victim must agree.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 32).max(1);
    let seed = u64::from(data[1]);
    let mut ordered = OrderedCache::with_seed(capacity, seed);
    let mut hashed = HashCache::with_seed(capacity, seed);

    let mut idx = 2;
    while idx + 1 < data.len() {
        let op = data[idx] % 4;
        let key = data[idx + 1] as u16;

        match op {
            0 => {
                ordered.insert(key, idx);
                hashed.insert(key, idx);
            }
            1 => {
                assert_eq!(ordered.find(&key).copied(), hashed.find(&key).copied());
            }
            2 => {
                assert_eq!(ordered.evict_key(&key), hashed.evict_key(&key));
            }
            3 => {
                assert_eq!(ordered.evict_one(), hashed.evict_one());
            }
            _ => unreachable!(),
        }

        assert_eq!(ordered.len(), hashed.len());
        assert_eq!(ordered.last_access(&key), hashed.last_access(&key));

        idx += 2;
    }
});
