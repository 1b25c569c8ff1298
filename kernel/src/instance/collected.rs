//! Fixed-size bit array over target ids.
//!
//! One bit per target, packed into `u64` words. Membership and insertion
//! are O(1); the capacity is fixed at construction and is not
//! bounded by the native integer width.

use super::target::TargetId;

const WORD_BITS: usize = 64;

/// Set of collected target ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectedSet {
    words: Vec<u64>,
    capacity: usize,
}

impl CollectedSet {
    /// An empty set able to hold ids `0..capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// Number of addressable ids.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `id` is in the set. Out-of-range ids are never members.
    #[must_use]
    pub fn contains(&self, id: TargetId) -> bool {
        let idx = id as usize;
        idx < self.capacity && self.words[idx / WORD_BITS] & (1 << (idx % WORD_BITS)) != 0
    }

    /// Insert `id`. Returns `true` if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the capacity (a caller defect).
    pub fn insert(&mut self, id: TargetId) -> bool {
        let idx = id as usize;
        assert!(
            idx < self.capacity,
            "target id {id} out of range for capacity {}",
            self.capacity
        );
        let mask = 1u64 << (idx % WORD_BITS);
        let word = &mut self.words[idx / WORD_BITS];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    /// Number of ids in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Member ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TargetId> + '_ {
        (0..self.capacity)
            .filter_map(|idx| TargetId::try_from(idx).ok())
            .filter(|&id| self.contains(id))
    }
}
