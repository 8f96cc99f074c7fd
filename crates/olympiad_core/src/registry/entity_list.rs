//! Fixed-capacity entity list over a slot array.
//!
//! Slot 0 is the head sentinel and slot `capacity + 1` the tail sentinel.
//! Active entities form a doubly-linked ring between them through
//! `next`/`prev`. Unused slots form a singly-linked free chain through
//! `next`, starting at `first_free` and ending at 0. When the chain is
//! empty `first_free` holds the tail index.
//!
//! Slot relinking is O(1), but `allocate_after` and `release` first check
//! that the index is active by walking the ring, so both are O(capacity).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::error::ListError;
use crate::MAX_NUM_ENTITIES;

/// Which registry a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Tournament,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Tournament => write!(f, "tournament"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityList {
    kind: EntityKind,
    capacity: u32,
    first_free: u32,
    slots: Vec<Entity>,
}

impl EntityList {
    pub const HEAD: u32 = 0;

    pub fn new(kind: EntityKind, capacity: u32) -> Result<Self, ListError> {
        if capacity > MAX_NUM_ENTITIES {
            return Err(ListError::InvalidCapacity { capacity, max: MAX_NUM_ENTITIES });
        }

        let tail = capacity + 1;
        let mut slots = Vec::with_capacity(tail as usize + 1);

        slots.push(Entity::vacant(tail, Self::HEAD));
        for i in 1..tail {
            // last free slot terminates the chain with 0
            slots.push(Entity::vacant((i + 1) % tail, 0));
        }
        slots.push(Entity::vacant(tail, Self::HEAD));

        let first_free = if capacity == 0 { tail } else { 1 };
        Ok(Self { kind, capacity, first_free, slots })
    }

    /// Rebuild a list exactly as stored. Only the shape is checked here;
    /// linkage is trusted until [`EntityList::verify`] runs.
    pub fn from_raw_parts(
        kind: EntityKind,
        capacity: u32,
        first_free: u32,
        slots: Vec<Entity>,
    ) -> Result<Self, ListError> {
        if capacity > MAX_NUM_ENTITIES {
            return Err(ListError::InvalidCapacity { capacity, max: MAX_NUM_ENTITIES });
        }
        if slots.len() != capacity as usize + 2 {
            return Err(ListError::Corruption {
                kind,
                reason: format!("expected {} slots, found {}", capacity + 2, slots.len()),
            });
        }
        Ok(Self { kind, capacity, first_free, slots })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn first_free(&self) -> u32 {
        self.first_free
    }

    pub fn tail(&self) -> u32 {
        self.capacity + 1
    }

    /// Every slot, sentinels included, in array order.
    pub fn slots(&self) -> &[Entity] {
        &self.slots
    }

    /// Raw slot access, active or not.
    pub fn slot(&self, index: u32) -> Option<&Entity> {
        self.slots.get(index as usize)
    }

    pub fn get(&self, index: u32) -> Option<&Entity> {
        if self.is_active(index) {
            self.slots.get(index as usize)
        } else {
            None
        }
    }

    /// Mutable access to an active entity. Links must be left alone.
    pub fn get_mut(&mut self, index: u32) -> Option<&mut Entity> {
        if self.is_active(index) {
            self.slots.get_mut(index as usize)
        } else {
            None
        }
    }

    fn is_chain_end(&self, index: u32) -> bool {
        index == 0 || index == self.tail()
    }

    pub fn is_full(&self) -> bool {
        self.is_chain_end(self.first_free)
    }

    pub fn is_active(&self, index: u32) -> bool {
        index != Self::HEAD && self.iter_active().any(|i| i == index)
    }

    pub fn count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter_active().next().is_none()
    }

    /// Active indices in ring order.
    pub fn iter_active(&self) -> ActiveIter<'_> {
        ActiveIter {
            list: self,
            cursor: self.slots[Self::HEAD as usize].next,
            remaining: self.capacity,
        }
    }

    /// Free chain in pop order.
    pub fn iter_free(&self) -> impl Iterator<Item = u32> + '_ {
        let mut cursor = self.first_free;
        let mut remaining = self.capacity;
        std::iter::from_fn(move || {
            if remaining == 0 || self.is_chain_end(cursor) {
                return None;
            }
            let current = cursor;
            cursor = self.slots.get(current as usize)?.next;
            remaining -= 1;
            Some(current)
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter_active().map(move |i| self.slots[i as usize].name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<u32> {
        self.iter_active().find(|&i| self.slots[i as usize].name == name)
    }

    pub fn find_by_name(&self, name: &str) -> Result<u32, ListError> {
        self.find(name)
            .ok_or_else(|| ListError::NotFound { kind: self.kind, name: name.to_string() })
    }

    /// Take a free slot and append it before the tail sentinel.
    pub fn allocate(&mut self) -> Result<u32, ListError> {
        let last = self.slots[self.tail() as usize].prev;
        self.allocate_after(last)
    }

    /// Take a free slot and link it right after `anchor` (the head sentinel
    /// or an active index). The slot payload is reset.
    pub fn allocate_after(&mut self, anchor: u32) -> Result<u32, ListError> {
        if self.is_full() {
            return Err(ListError::CapacityExceeded { kind: self.kind, capacity: self.capacity });
        }
        if anchor != Self::HEAD && !self.is_active(anchor) {
            return Err(ListError::InvalidIndex { kind: self.kind, index: anchor });
        }

        let index = self.first_free;
        if index > self.capacity {
            return Err(ListError::Corruption {
                kind: self.kind,
                reason: format!("free chain head {} out of range", index),
            });
        }

        let next_free = self.slots[index as usize].next;
        let after = self.slots[anchor as usize].next;
        if after > self.tail() {
            return Err(ListError::Corruption {
                kind: self.kind,
                reason: format!("slot {} links to {}", anchor, after),
            });
        }

        self.first_free = if self.is_chain_end(next_free) { self.tail() } else { next_free };
        self.slots[index as usize] = Entity::vacant(after, anchor);
        self.slots[anchor as usize].next = index;
        self.slots[after as usize].prev = index;

        Ok(index)
    }

    /// Unlink an active entity and push its slot on the free chain.
    pub fn release(&mut self, index: u32) -> Result<(), ListError> {
        if index == Self::HEAD || index >= self.tail() || !self.is_active(index) {
            return Err(ListError::InvalidIndex { kind: self.kind, index });
        }

        let (prev, next) = {
            let entity = &self.slots[index as usize];
            (entity.prev, entity.next)
        };
        if prev > self.tail() || next > self.tail() {
            return Err(ListError::Corruption {
                kind: self.kind,
                reason: format!("slot {} links to {} and {}", index, prev, next),
            });
        }
        self.slots[prev as usize].next = next;
        self.slots[next as usize].prev = prev;

        let chain = if self.is_full() { 0 } else { self.first_free };
        self.slots[index as usize] = Entity::vacant(chain, 0);
        self.first_free = index;

        Ok(())
    }

    /// Allocate and name a new entity at the end of the list.
    pub fn add(&mut self, name: &str) -> Result<u32, ListError> {
        if self.find(name).is_some() {
            return Err(ListError::DuplicateName { kind: self.kind, name: name.to_string() });
        }
        let index = self.allocate()?;
        self.slots[index as usize].name = name.to_string();
        Ok(index)
    }

    pub fn rename(&mut self, index: u32, new_name: &str) -> Result<(), ListError> {
        if !self.is_active(index) {
            return Err(ListError::InvalidIndex { kind: self.kind, index });
        }
        match self.find(new_name) {
            Some(existing) if existing != index => {
                Err(ListError::DuplicateName { kind: self.kind, name: new_name.to_string() })
            }
            _ => {
                self.slots[index as usize].name = new_name.to_string();
                Ok(())
            }
        }
    }

    /// Check that the active ring and the free chain partition `1..=capacity`,
    /// that ring links are mutually consistent and that sentinels and free
    /// slots carry no identity.
    pub fn verify(&self) -> Result<(), ListError> {
        let corrupt = |reason: String| ListError::Corruption { kind: self.kind, reason };

        let tail = self.tail();
        if self.slots.len() != tail as usize + 1 {
            return Err(corrupt(format!("slot array has {} entries", self.slots.len())));
        }

        for (i, entity) in self.slots.iter().enumerate() {
            if entity.next > tail || entity.prev > tail {
                return Err(corrupt(format!(
                    "slot {} links to {} and {}",
                    i, entity.prev, entity.next
                )));
            }
        }
        if self.slots[Self::HEAD as usize].prev != Self::HEAD {
            return Err(corrupt(format!(
                "head prev is {}",
                self.slots[Self::HEAD as usize].prev
            )));
        }
        if self.slots[tail as usize].next != tail {
            return Err(corrupt(format!("tail next is {}", self.slots[tail as usize].next)));
        }

        for sentinel in [Self::HEAD, tail] {
            if !self.slots[sentinel as usize].has_empty_identity() {
                return Err(corrupt(format!("sentinel {} carries data", sentinel)));
            }
        }

        let mut seen = vec![false; tail as usize + 1];

        let mut prev = Self::HEAD;
        let mut cursor = self.slots[Self::HEAD as usize].next;
        while cursor != tail {
            if cursor == Self::HEAD || seen[cursor as usize] {
                return Err(corrupt(format!("active ring revisits slot {}", cursor)));
            }
            if self.slots[cursor as usize].prev != prev {
                return Err(corrupt(format!(
                    "slot {} has prev {}, expected {}",
                    cursor, self.slots[cursor as usize].prev, prev
                )));
            }
            seen[cursor as usize] = true;
            prev = cursor;
            cursor = self.slots[cursor as usize].next;
        }
        if self.slots[tail as usize].prev != prev {
            return Err(corrupt(format!(
                "tail prev is {}, last active is {}",
                self.slots[tail as usize].prev, prev
            )));
        }

        let mut cursor = self.first_free;
        if cursor > tail {
            return Err(corrupt(format!("first_free {} out of range", cursor)));
        }
        while !self.is_chain_end(cursor) {
            if seen[cursor as usize] {
                return Err(corrupt(format!("slot {} is both active and free", cursor)));
            }
            if !self.slots[cursor as usize].has_empty_identity() {
                return Err(corrupt(format!("free slot {} carries data", cursor)));
            }
            seen[cursor as usize] = true;
            cursor = self.slots[cursor as usize].next;
        }

        if let Some(orphan) = (1..tail).find(|&i| !seen[i as usize]) {
            return Err(corrupt(format!("slot {} is neither active nor free", orphan)));
        }

        Ok(())
    }
}

/// Lazy walk of the active ring. Bounded by the capacity, so a corrupt
/// cycle cannot make it loop forever.
pub struct ActiveIter<'a> {
    list: &'a EntityList,
    cursor: u32,
    remaining: u32,
}

impl Iterator for ActiveIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0
            || self.cursor == EntityList::HEAD
            || self.cursor >= self.list.tail()
        {
            return None;
        }
        let current = self.cursor;
        self.cursor = self.list.slots[current as usize].next;
        self.remaining -= 1;
        Some(current)
    }
}
