//! Fixed-capacity membership bits.
//!
//! Each entity carries two of these: one bit per registered component type
//! and one bit per group. The capacity comes from
//! [`EcsConfig`](crate::config::EcsConfig) and never grows, so an
//! out-of-range bit is reported instead of silently widening the set.

use fixedbitset::FixedBitSet;

#[derive(Clone, Debug)]
pub(crate) struct Mask {
    bits: FixedBitSet,
}

impl Mask {
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Set `bit`. Returns `false` if it is beyond the capacity.
    pub fn set(&mut self, bit: usize) -> bool {
        if bit >= self.capacity() {
            return false;
        }
        self.bits.insert(bit);
        true
    }

    pub fn clear(&mut self, bit: usize) {
        if bit < self.capacity() {
            self.bits.set(bit, false);
        }
    }

    pub fn contains(&self, bit: usize) -> bool {
        self.bits.contains(bit)
    }

    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }
}
