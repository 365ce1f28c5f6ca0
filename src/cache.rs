//! The unified operation cache: one direct-mapped table for every kernel.
//!
//! A single cache memoizes BDD, ADD and ZDD recursions. Each entry stores an
//! operation tag, up to three operand words and the result handle. Lookup
//! hashes `(op, a, b, c)` to exactly one slot and answers only on an exact
//! key match; insertion overwrites unconditionally.
//!
//! Clearing is O(1) via a generation counter (no memory is zeroed), which
//! matters because the collector must invalidate the whole cache after every
//! sweep: a surviving entry could name a freed node.

use std::cell::Cell;

use crate::reference::Ref;
use crate::utils::{pairing4, MyHash};

/// Default number of cache entries (2^18).
pub const DEFAULT_CACHE_SIZE: usize = 1 << 18;

/// Operation tags. Disjoint by construction; ADD tags encode the operator
/// identity so `apply(+, f, g)` and `apply(*, f, g)` never share a key.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Op {
    #[default]
    Ite,
    And,
    Or,
    Xor,
    Restrict,
    ZddUnion,
    ZddIntersect,
    ZddDiff,
    ZddJoin,
    ZddSubset0,
    ZddSubset1,
    ZddChange,
    AddPlus,
    AddMinus,
    AddTimes,
    AddDivide,
    AddMax,
    AddMin,
    AddThreshold,
    AddRestrict,
}

/// A cache key: operation tag plus up to three operand words.
///
/// Operands are raw 64-bit words rather than typed handles because some
/// operations key on non-handle data (a variable index, the bits of an ADD
/// threshold). Unused positions are zero; tags keep keys of different
/// operations disjoint regardless.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct OpKey {
    op: Op,
    a: u64,
    b: u64,
    c: u64,
}

impl OpKey {
    pub fn binary(op: Op, f: Ref, g: Ref) -> Self {
        Self { op, a: f.raw(), b: g.raw(), c: 0 }
    }

    /// Key for a commutative binary operation: operands are ordered by raw
    /// handle value so `(f, g)` and `(g, f)` hit the same slot.
    pub fn commutative(op: Op, f: Ref, g: Ref) -> Self {
        if f.raw() <= g.raw() {
            Self::binary(op, f, g)
        } else {
            Self::binary(op, g, f)
        }
    }

    pub fn ternary(op: Op, f: Ref, g: Ref, h: Ref) -> Self {
        Self { op, a: f.raw(), b: g.raw(), c: h.raw() }
    }

    /// Key for an operation on a handle and an arbitrary word (a variable
    /// index, threshold bits, ...).
    pub fn with_word(op: Op, f: Ref, word: u64) -> Self {
        Self { op, a: f.raw(), b: word, c: 0 }
    }
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        pairing4(self.op as u64, self.a, self.b, self.c)
    }
}

#[derive(Clone)]
struct Entry {
    key: OpKey,
    value: Ref,
    generation: u64,
}

/// Direct-mapped operation cache with generation-based O(1) clearing.
pub struct OpCache {
    entries: Vec<Entry>,
    bitmask: u64,
    generation: Cell<u64>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl Default for OpCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl OpCache {
    /// Creates a cache with at least `size` slots, rounded up to a power of
    /// two.
    pub fn new(size: usize) -> Self {
        let size = size.max(2).next_power_of_two();
        Self {
            entries: vec![
                Entry {
                    key: OpKey::default(),
                    value: Ref::INVALID,
                    generation: 0, // invalid: generations start at 1
                };
                size
            ],
            bitmask: (size - 1) as u64,
            generation: Cell::new(1),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Invalidates every entry in O(1) by bumping the generation counter.
    pub fn clear(&mut self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    #[inline]
    fn index(&self, key: &OpKey) -> usize {
        (key.hash() & self.bitmask) as usize
    }

    /// Returns the memoized result for `key`, if present.
    #[inline]
    pub fn get(&self, key: &OpKey) -> Option<Ref> {
        let entry = &self.entries[self.index(key)];
        if entry.generation == self.generation.get() && entry.key == *key {
            self.hits.set(self.hits.get() + 1);
            Some(entry.value)
        } else {
            self.misses.set(self.misses.get() + 1);
            None
        }
    }

    /// Stores a result, overwriting whatever occupied the slot.
    #[inline]
    pub fn insert(&mut self, key: OpKey, value: Ref) {
        let index = self.index(&key);
        self.entries[index] = Entry {
            key,
            value,
            generation: self.generation.get(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let mut cache = OpCache::new(16);
        let f = Ref::positive(2);
        let g = Ref::positive(3);

        let key = OpKey::binary(Op::And, f, g);
        assert_eq!(cache.get(&key), None);

        cache.insert(key, Ref::positive(4));
        assert_eq!(cache.get(&key), Some(Ref::positive(4)));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_tags_are_disjoint() {
        let mut cache = OpCache::new(16);
        let f = Ref::positive(2);
        let g = Ref::positive(3);

        cache.insert(OpKey::binary(Op::AddPlus, f, g), Ref::positive(10));
        assert_eq!(cache.get(&OpKey::binary(Op::AddTimes, f, g)), None);
        assert_eq!(cache.get(&OpKey::binary(Op::AddPlus, f, g)), Some(Ref::positive(10)));
    }

    #[test]
    fn test_commutative_key() {
        let f = Ref::positive(2);
        let g = Ref::negative(9);
        assert_eq!(OpKey::commutative(Op::And, f, g), OpKey::commutative(Op::And, g, f));
        assert_ne!(OpKey::binary(Op::ZddDiff, f, g), OpKey::binary(Op::ZddDiff, g, f));
    }

    #[test]
    fn test_clear_is_total() {
        let mut cache = OpCache::new(16);
        let key = OpKey::ternary(Op::Ite, Ref::positive(2), Ref::positive(3), Ref::positive(4));
        cache.insert(key, Ref::positive(5));
        assert_eq!(cache.get(&key), Some(Ref::positive(5)));

        cache.clear();
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn test_rounds_up_to_power_of_two() {
        let cache = OpCache::new(1000);
        assert_eq!(cache.capacity(), 1024);
    }

    #[test]
    fn test_overwrite() {
        let mut cache = OpCache::new(16);
        let key = OpKey::binary(Op::Or, Ref::positive(2), Ref::positive(3));
        cache.insert(key, Ref::positive(7));
        cache.insert(key, Ref::positive(8));
        assert_eq!(cache.get(&key), Some(Ref::positive(8)));
    }
}
