#![no_main]

use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sampled_lru::ds::SampleIndex;

// Fuzz arbitrary operation sequences on SampleIndex
//
// Handles are kept after unlinking, so stale ids that were later reused by
// the free list are exercised too. Every step ends with a full check.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut index: SampleIndex<u8, u8> = SampleIndex::with_capacity(data[0] as usize);
    let mut rng = SmallRng::seed_from_u64(u64::from(data[0]));
    let mut all_ids = Vec::new();

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let byte = data[idx + 1];

        match op {
            0 => {
                let clock = index.clock();
                let id = index.push(byte, byte);
                all_ids.push(id);
                let entry = index.get(id).unwrap();
                assert_eq!(entry.timestamp(), clock);
                assert_eq!(entry.position(), index.len() - 1);
            }
            1 => {
                if !all_ids.is_empty() {
                    let id = all_ids[(byte as usize) % all_ids.len()];
                    let old_len = index.len();
                    if index.unlink(id).is_some() {
                        assert_eq!(index.len(), old_len - 1);
                        assert!(index.get(id).is_none());
                    } else {
                        assert_eq!(index.len(), old_len);
                    }
                }
            }
            2 => {
                if !all_ids.is_empty() {
                    let id = all_ids[(byte as usize) % all_ids.len()];
                    let clock = index.clock();
                    match index.touch(id) {
                        Some(entry) => assert_eq!(entry.timestamp(), clock),
                        None => assert_eq!(index.clock(), clock),
                    }
                }
            }
            3 => match index.sample(&mut rng) {
                Some(sample) => {
                    let handles = index.handles();
                    let a = index.get(handles[sample.first]).unwrap().timestamp();
                    let b = index.get(handles[sample.second]).unwrap().timestamp();
                    assert_eq!(index.get(sample.victim).unwrap().timestamp(), a.min(b));
                }
                None => assert!(index.is_empty()),
            },
            4 => {
                // allocate, then either link or drop before linking
                let id = index.allocate(byte, byte);
                if byte % 2 == 0 {
                    index.link(id);
                    all_ids.push(id);
                } else {
                    assert!(index.unlink(id).is_some());
                }
            }
            5 => {
                index.clear();
                all_ids.clear();
                assert!(index.is_empty());
            }
            _ => unreachable!(),
        }

        if let Err(err) = index.check_invariants() {
            panic!("{err}");
        }
        idx += 2;
    }
});
