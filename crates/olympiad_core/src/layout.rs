//! C struct layout arithmetic.
//!
//! The consumer of the save file reads records with its compiler's native
//! struct layout: every member starts at a multiple of its own alignment and
//! the struct size is rounded up to the alignment of its widest member. Rust
//! layout is never used to derive these numbers; every offset below is
//! computed from the sizes that precede it.

use crate::{BRACKET_SIZE, MAX_GROUPS, MAX_GROUP_SIZE, MAX_NUM_ENTITIES};

/// Round `offset` up to the next multiple of `align` (a power of two).
pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Number of zero bytes needed after `offset` to reach `align`.
pub const fn padding_for(offset: usize, align: usize) -> usize {
    align_up(offset, align) - offset
}

/// Entries of the per-entity reverse lookup tables (index 0 included).
pub const LOOKUP_LEN: usize = MAX_NUM_ENTITIES as usize + 1;

/// Cells of a `[group][slot][slot]` table.
pub const PAIRINGS: usize = MAX_GROUPS * MAX_GROUP_SIZE * MAX_GROUP_SIZE;

pub const SCORE_SIZE: usize = 4;
pub const SCORE_ALIGN: usize = 2;
pub const RESULT_SIZE: usize = 4;
pub const RESULT_ALIGN: usize = 4;

/// Byte offsets of every group phase member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPhaseLayout {
    pub groups: usize,
    pub player_group: usize,
    pub player_slot: usize,
    pub scores: usize,
    pub results: usize,
    pub knockout: usize,
    pub size: usize,
}

impl GroupPhaseLayout {
    pub const fn compute() -> Self {
        // num_groups, group_size, advance_per_group
        let groups = 3;
        let player_group = groups + MAX_GROUPS * MAX_GROUP_SIZE;
        let player_slot = player_group + LOOKUP_LEN;
        let scores = align_up(player_slot + LOOKUP_LEN, SCORE_ALIGN);
        let results = align_up(scores + PAIRINGS * SCORE_SIZE, RESULT_ALIGN);
        let knockout = results + PAIRINGS * RESULT_SIZE;
        let size = align_up(knockout + BRACKET_SIZE, RESULT_ALIGN);

        Self { groups, player_group, player_slot, scores, results, knockout, size }
    }
}

pub const GROUP_PHASE_LAYOUT: GroupPhaseLayout = GroupPhaseLayout::compute();
pub const GROUP_PHASE_SIZE: usize = GROUP_PHASE_LAYOUT.size;

/// next, prev, name_len, registrations, medals, phase, format, bracket.
pub const ENTITY_FIXED_PREFIX: usize = 4 + 4 + 4 + 8 + 3 + 1 + 1 + BRACKET_SIZE;

/// Encoded entity size without its name bytes.
pub const ENTITY_FIXED_SIZE: usize = ENTITY_FIXED_PREFIX + GROUP_PHASE_SIZE;

/// magic, version, then (capacity, first_free) for both lists.
pub const HEADER_SIZE: usize = 6 * 4;

/// Smallest possible file for the given capacities (all names empty).
pub const fn min_file_size(players_capacity: u32, tournaments_capacity: u32) -> usize {
    let slots = players_capacity as usize + 2 + tournaments_capacity as usize + 2;
    HEADER_SIZE + slots * ENTITY_FIXED_SIZE
}
