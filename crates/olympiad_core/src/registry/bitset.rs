//! Registration bitmap between a player list and a tournament list.
//!
//! Bit `k` of an entity's bitmap links it to the entity at 1-based index
//! `k + 1` in the other list. Slot 0 is the head sentinel and never has a
//! bit; index 64 takes bit 63.

use crate::MAX_NUM_ENTITIES;

/// Bit position for a 1-based companion index.
pub fn index_to_bit(index: u32) -> Option<u32> {
    if index == 0 || index > MAX_NUM_ENTITIES {
        return None;
    }
    Some(index - 1)
}

/// Companion index for a bit position.
pub fn bit_to_index(bit: u32) -> u32 {
    bit + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Registrations(pub u64);

impl Registrations {
    pub const EMPTY: Self = Self(0);

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(self, index: u32) -> bool {
        match index_to_bit(index) {
            Some(bit) => self.0 & (1u64 << bit) != 0,
            None => false,
        }
    }

    /// Returns false when `index` has no bit (sentinel or out of range).
    pub fn insert(&mut self, index: u32) -> bool {
        match index_to_bit(index) {
            Some(bit) => {
                self.0 |= 1u64 << bit;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: u32) -> bool {
        match index_to_bit(index) {
            Some(bit) => {
                let was_set = self.0 & (1u64 << bit) != 0;
                self.0 &= !(1u64 << bit);
                was_set
            }
            None => false,
        }
    }

    /// Companion indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let bit = bits.trailing_zeros();
            bits &= bits - 1;
            Some(bit_to_index(bit))
        })
    }
}

impl From<u64> for Registrations {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}
