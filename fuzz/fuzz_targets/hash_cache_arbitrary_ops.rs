#![no_main]

use libfuzzer_sys::fuzz_target;
use sampled_lru::policy::hashed::HashCache;

// Fuzz arbitrary operation sequences on HashCache
//
// First byte picks the capacity, second the seed. Every following triple is
// (op, key, value). The dense index is validated after each step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize % 50).max(1);
    let mut cache = HashCache::with_seed(capacity, u64::from(data[1]));

    let mut idx = 2;
    while idx + 2 < data.len() {
        let op = data[idx] % 7;
        let key = data[idx + 1] as u32;
        let value = data[idx + 2] as u32;

        match op {
            0 => {
                cache.insert(key, value);
                assert_eq!(cache.peek(&key), Some(&value));
            }
            1 => {
                let had = cache.contains(&key);
                assert_eq!(cache.find(&key).is_some(), had);
            }
            2 => {
                let _ = cache.peek(&key);
            }
            3 => {
                let len = cache.len();
                let removed = cache.evict_key(&key).is_some();
                assert_eq!(cache.len(), len - usize::from(removed));
                assert!(!cache.contains(&key));
            }
            4 => {
                let len = cache.len();
                match cache.evict_one() {
                    Some((victim, _)) => {
                        assert_eq!(cache.len(), len - 1);
                        assert!(!cache.contains(&victim));
                    }
                    None => assert_eq!(len, 0),
                }
            }
            5 => {
                cache.remove_key(&key);
            }
            6 => {
                cache.clear();
                assert!(cache.is_empty());
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= cache.capacity());
        if let Err(err) = cache.check_invariants() {
            panic!("{err}");
        }

        idx += 3;
    }
});
