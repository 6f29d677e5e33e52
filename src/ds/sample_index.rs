//! Dense sampling index shared by every sampled cache.
//!
//! `SampleIndex` owns the entries, the dense array of their handles, and the
//! logical clock. Entries sit in a slot vector with a free list, so a
//! [`SlotId`] stays valid until its own entry is unlinked. The caches keep
//! only a key → handle map on top of it, so the bookkeeping below is
//! identical for ordered and hashed storage.
//!
//! ```text
//!   key map (BTreeMap / FxHashMap)      slots                       dense
//!   ┌──────┬──────┐                     ┌────┬──────────────────┐   ┌────┬────┬────┐
//!   │ "a"  │ #0   │ ──────────────────► │ #0 │ a, v, ts=4, pos=1│◄──│ #2 │ #0 │ #1 │
//!   │ "b"  │ #1   │ ──────────────────► │ #1 │ b, v, ts=2, pos=2│◄──└────┴────┴────┘
//!   │ "c"  │ #2   │ ──────────────────► │ #2 │ c, v, ts=3, pos=0│◄──   0    1    2
//!   └──────┴──────┘                     └────┴──────────────────┘
//! ```
//!
//! Unlinking `#0` (position 1) moves the last handle `#1` into position 1,
//! pops the tail, and rewrites `#1`'s recorded position to 1.

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::InvariantError;

/// Upper bound on storage reserved at construction. Larger caches grow on
/// demand.
pub const MAX_RESERVE: usize = 1 << 16;

/// Position recorded by an entry that is allocated but not yet linked.
const UNLINKED: usize = usize::MAX;

/// Stable handle to a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Slot number backing this handle. Reused after the entry is unlinked.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A live cache entry.
///
/// `key` duplicates the key map's key so a sampled slot can be unlinked from
/// the map without a reverse lookup.
#[derive(Debug, Clone)]
pub struct SampledEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) timestamp: u64,
    pub(crate) position: usize,
}

impl<K, V> SampledEntry<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Clock value of the last insert or successful lookup.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Slot of this entry's handle in the dense array.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_key_value(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Outcome of one two-candidate draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Handle of the older candidate.
    pub victim: SlotId,
    pub first: usize,
    pub second: usize,
}

impl Sample {
    /// Both draws landed on the same slot.
    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }
}

#[derive(Debug)]
pub struct SampleIndex<K, V> {
    slots: Vec<Option<SampledEntry<K, V>>>,
    vacant: Vec<usize>,
    dense: Vec<SlotId>,
    clock: u64,
}

impl<K, V> SampleIndex<K, V> {
    /// Reserves room for `capacity` entries, up to [`MAX_RESERVE`].
    pub fn with_capacity(capacity: usize) -> Self {
        let reserve = capacity.min(MAX_RESERVE);
        Self {
            slots: Vec::with_capacity(reserve),
            vacant: Vec::new(),
            dense: Vec::with_capacity(reserve),
            clock: 0,
        }
    }

    /// Number of linked entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Next clock value to be handed out.
    #[inline]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        let now = self.clock;
        self.clock += 1;
        now
    }

    /// Entries held in slots, linked or not.
    fn occupied(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&SampledEntry<K, V>> {
        self.slots.get(id.0)?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut SampledEntry<K, V>> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Stamps the entry with a fresh clock value and returns it.
    #[inline]
    pub fn touch(&mut self, id: SlotId) -> Option<&mut SampledEntry<K, V>> {
        if self.get(id).is_none() {
            return None;
        }
        let now = self.tick();
        let entry = self.get_mut(id)?;
        entry.timestamp = now;
        Some(entry)
    }

    /// Stores a new entry stamped with a fresh clock value without linking it
    /// into the dense array. It cannot be sampled until [`link`](Self::link).
    pub fn allocate(&mut self, key: K, value: V) -> SlotId {
        let entry = SampledEntry {
            key,
            value,
            timestamp: self.tick(),
            position: UNLINKED,
        };
        match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                SlotId(slot)
            },
            None => {
                self.slots.push(Some(entry));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Appends an allocated entry's handle to the dense array.
    pub fn link(&mut self, id: SlotId) {
        let position = self.dense.len();
        if let Some(entry) = self.get_mut(id) {
            entry.position = position;
            self.dense.push(id);
        }

        #[cfg(debug_assertions)]
        debug_assert!(self.check_position(position).is_ok());
    }

    /// [`allocate`](Self::allocate) followed by [`link`](Self::link).
    pub fn push(&mut self, key: K, value: V) -> SlotId {
        let id = self.allocate(key, value);
        self.link(id);
        id
    }

    /// Draws two positions uniformly with replacement and returns the handle
    /// with the smaller timestamp. `None` when nothing is linked.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Sample> {
        let len = self.dense.len();
        if len == 0 {
            return None;
        }
        let first = rng.random_range(0..len);
        let second = rng.random_range(0..len);
        let p = self.dense[first];
        let q = self.dense[second];
        let victim = match (self.get(p), self.get(q)) {
            (Some(a), Some(b)) if b.timestamp < a.timestamp => q,
            _ => p,
        };
        Some(Sample {
            victim,
            first,
            second,
        })
    }

    /// Removes the entry and its dense handle in O(1).
    ///
    /// The last handle fills the vacated position and has its recorded
    /// position rewritten. The caller still owns removing `entry.key` from its
    /// key map.
    pub fn unlink(&mut self, id: SlotId) -> Option<SampledEntry<K, V>> {
        let entry = self.slots.get_mut(id.0)?.take()?;
        self.vacant.push(id.0);

        let position = entry.position;
        if position >= self.dense.len() {
            // allocated but never linked
            return Some(entry);
        }
        self.dense.swap_remove(position);
        if let Some(&moved) = self.dense.get(position) {
            if let Some(moved_entry) = self.get_mut(moved) {
                moved_entry.position = position;
            }
        }

        #[cfg(debug_assertions)]
        debug_assert!(self.check_position(position).is_ok());

        Some(entry)
    }

    /// Drops every entry. The clock keeps counting so timestamps stay unique
    /// over the lifetime of the cache.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
        self.dense.clear();
    }

    /// Handles in dense order.
    pub fn handles(&self) -> &[SlotId] {
        &self.dense
    }

    /// Checks the single dense slot at `position`. Positions past the end are
    /// trivially fine.
    pub fn check_position(&self, position: usize) -> Result<(), InvariantError> {
        let Some(&id) = self.dense.get(position) else {
            return Ok(());
        };
        let entry = self.get(id).ok_or_else(|| {
            InvariantError::new(format!("dense slot {} holds stale {:?}", position, id))
        })?;
        if entry.position != position {
            return Err(InvariantError::new(format!(
                "{:?} records position {} but sits at {}",
                id, entry.position, position
            )));
        }
        if entry.timestamp >= self.clock {
            return Err(InvariantError::new(format!(
                "{:?} has timestamp {} ahead of clock {}",
                id, entry.timestamp, self.clock
            )));
        }
        Ok(())
    }

    /// Checks every dense slot and timestamp uniqueness. O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.occupied() != self.dense.len() {
            return Err(InvariantError::new(format!(
                "{} slots occupied but dense index holds {}",
                self.occupied(),
                self.dense.len()
            )));
        }

        let mut seen = FxHashSet::default();
        for (position, &id) in self.dense.iter().enumerate() {
            self.check_position(position)?;
            let timestamp = self.get(id).map_or(0, |entry| entry.timestamp);
            if !seen.insert(timestamp) {
                return Err(InvariantError::new(format!(
                    "timestamp {} assigned twice",
                    timestamp
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn filled(n: u32) -> (SampleIndex<u32, u32>, Vec<SlotId>) {
        let mut index = SampleIndex::with_capacity(n as usize);
        let ids = (0..n).map(|k| index.push(k, k * 10)).collect();
        (index, ids)
    }

    // ==============================================
    // Linking and Unlinking
    // ==============================================

    mod linking {
        use super::*;

        #[test]
        fn push_assigns_positions_and_timestamps_in_order() {
            let (index, ids) = filled(4);
            for (i, id) in ids.iter().enumerate() {
                let entry = index.get(*id).unwrap();
                assert_eq!(entry.position(), i);
                assert_eq!(entry.timestamp(), i as u64);
            }
            assert_eq!(index.clock(), 4);
            index.check_invariants().unwrap();
        }

        #[test]
        fn unlink_middle_moves_last_into_hole() {
            let (mut index, ids) = filled(4);
            let removed = index.unlink(ids[1]).unwrap();
            assert_eq!(removed.into_key_value(), (1, 10));

            assert_eq!(index.len(), 3);
            assert_eq!(index.handles(), &[ids[0], ids[3], ids[2]]);
            assert_eq!(index.get(ids[3]).unwrap().position(), 1);
            index.check_invariants().unwrap();
        }

        #[test]
        fn unlink_last_only_pops() {
            let (mut index, ids) = filled(3);
            index.unlink(ids[2]).unwrap();
            assert_eq!(index.handles(), &[ids[0], ids[1]]);
            index.check_invariants().unwrap();
        }

        #[test]
        fn unlink_stale_handle_is_none() {
            let (mut index, ids) = filled(2);
            assert!(index.unlink(ids[0]).is_some());
            assert!(index.unlink(ids[0]).is_none());
            assert!(index.touch(ids[0]).is_none());
            index.check_invariants().unwrap();
        }

        #[test]
        fn freed_slot_is_reused_and_other_handles_survive() {
            let (mut index, ids) = filled(4);
            index.unlink(ids[1]);
            let fresh = index.push(9, 90);
            assert_eq!(fresh.index(), ids[1].index());
            assert_eq!(index.get(ids[3]).unwrap().value(), &30);
            assert_eq!(index.get(fresh).unwrap().key(), &9);
            index.check_invariants().unwrap();
        }

        #[test]
        fn unlink_of_unlinked_allocation_leaves_dense_alone() {
            let (mut index, ids) = filled(2);
            let pending = index.allocate(7, 70);
            assert_eq!(index.unlink(pending).unwrap().into_key_value(), (7, 70));
            assert_eq!(index.handles(), ids.as_slice());
            index.check_invariants().unwrap();
        }

        #[test]
        fn pending_allocation_fails_full_check_until_linked() {
            let (mut index, _) = filled(2);
            let pending = index.allocate(7, 70);
            assert!(index.check_invariants().is_err());
            index.link(pending);
            index.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Sampling
    // ==============================================

    mod sampling {
        use super::*;

        #[test]
        fn allocated_entry_is_invisible_to_sampling_until_linked() {
            let mut index: SampleIndex<u32, u32> = SampleIndex::with_capacity(2);
            let mut rng = SmallRng::seed_from_u64(1);
            let id = index.allocate(9, 90);
            assert!(index.sample(&mut rng).is_none());
            assert_eq!(index.len(), 0);

            index.link(id);
            let sample = index.sample(&mut rng).unwrap();
            assert_eq!(sample.victim, id);
            assert!(sample.is_self_pair());
            index.check_invariants().unwrap();
        }

        #[test]
        fn sample_returns_older_candidate() {
            let (mut index, ids) = filled(8);
            // slot 5 is left strictly the oldest
            for (i, id) in ids.iter().enumerate() {
                if i != 5 {
                    index.touch(*id);
                }
            }
            let mut rng = SmallRng::seed_from_u64(42);
            for _ in 0..200 {
                let sample = index.sample(&mut rng).unwrap();
                let victim_ts = index.get(sample.victim).unwrap().timestamp();
                let a = index.get(index.handles()[sample.first]).unwrap().timestamp();
                let b = index.get(index.handles()[sample.second]).unwrap().timestamp();
                assert_eq!(victim_ts, a.min(b));
            }
        }
    }

    // ==============================================
    // Clock and Storage
    // ==============================================

    mod clock_and_storage {
        use super::*;

        #[test]
        fn touch_advances_clock_once() {
            let (mut index, ids) = filled(2);
            let before = index.clock();
            let ts = index.touch(ids[0]).unwrap().timestamp();
            assert_eq!(ts, before);
            assert_eq!(index.clock(), before + 1);
            index.check_invariants().unwrap();
        }

        #[test]
        fn clear_keeps_clock_running() {
            let (mut index, _) = filled(3);
            index.clear();
            assert!(index.is_empty());
            let id = index.push(1, 1);
            assert_eq!(index.get(id).unwrap().timestamp(), 3);
            index.check_invariants().unwrap();
        }

        #[test]
        fn huge_capacity_reserves_a_bounded_amount() {
            let mut index: SampleIndex<u8, u8> = SampleIndex::with_capacity(usize::MAX);
            assert!(index.dense.capacity() <= MAX_RESERVE);
            assert!(index.slots.capacity() <= MAX_RESERVE);
            index.push(1, 1);
            assert_eq!(index.len(), 1);
        }

        #[test]
        fn check_position_flags_a_bad_record() {
            let (mut index, ids) = filled(3);
            index.check_position(1).unwrap();
            index.check_position(99).unwrap();
            index.get_mut(ids[1]).unwrap().position = 2;
            assert!(index.check_position(1).is_err());
            assert!(index.check_invariants().is_err());
        }
    }
}
