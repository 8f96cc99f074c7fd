//! Round-robin group stage record.
//!
//! Every entity embeds one of these at full size, whatever its competition
//! format, so the record length never depends on its content.

use crate::codec::{ByteReader, ByteWriter, CodecError};
use crate::layout::{LOOKUP_LEN, RESULT_ALIGN, SCORE_ALIGN};
use crate::{BRACKET_SIZE, GROUP_NONE, MAX_GROUPS, MAX_GROUP_SIZE};

/// Written into `groups` for an empty slot. Entity indices are 1-based.
pub const SLOT_EMPTY: u8 = 0;

pub const DEFAULT_GROUP_SIZE: u8 = 4;
pub const DEFAULT_ADVANCE_PER_GROUP: u8 = 2;

/// Goals (or points) of one pairing, seen from the row player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchScore {
    pub row_score: u16,
    pub col_score: u16,
}

/// 32-bit result tag of one pairing. Unknown tags are kept as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatchResult(pub u32);

impl MatchResult {
    pub const NOT_PLAYED: Self = Self(0);
    pub const IN_PROGRESS: Self = Self(1);
    pub const ROW_WIN: Self = Self(2);
    pub const COL_WIN: Self = Self(3);
    pub const DRAW: Self = Self(4);

    pub fn is_decided(self) -> bool {
        matches!(self, Self::ROW_WIN | Self::COL_WIN | Self::DRAW)
    }

    /// Same result seen from the other side of the table.
    pub fn mirrored(self) -> Self {
        match self {
            Self::ROW_WIN => Self::COL_WIN,
            Self::COL_WIN => Self::ROW_WIN,
            other => other,
        }
    }
}

pub type ScoreTable = [[[MatchScore; MAX_GROUP_SIZE]; MAX_GROUP_SIZE]; MAX_GROUPS];
pub type ResultTable = [[[MatchResult; MAX_GROUP_SIZE]; MAX_GROUP_SIZE]; MAX_GROUPS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPhase {
    pub num_groups: u8,
    pub group_size: u8,
    pub advance_per_group: u8,

    /// Occupant entity index per group and slot
    pub groups: [[u8; MAX_GROUP_SIZE]; MAX_GROUPS],

    /// Reverse lookup by global entity index
    pub player_group: [u8; LOOKUP_LEN],
    pub player_slot: [u8; LOOKUP_LEN],

    pub scores: ScoreTable,
    pub results: ResultTable,

    /// Knockout bracket seeded from the group qualifiers
    pub knockout: [u8; BRACKET_SIZE],
}

impl Default for GroupPhase {
    fn default() -> Self {
        Self {
            num_groups: 0,
            group_size: DEFAULT_GROUP_SIZE,
            advance_per_group: DEFAULT_ADVANCE_PER_GROUP,
            groups: [[SLOT_EMPTY; MAX_GROUP_SIZE]; MAX_GROUPS],
            player_group: [GROUP_NONE; LOOKUP_LEN],
            player_slot: [0; LOOKUP_LEN],
            scores: [[[MatchScore::default(); MAX_GROUP_SIZE]; MAX_GROUP_SIZE]; MAX_GROUPS],
            results: [[[MatchResult::NOT_PLAYED; MAX_GROUP_SIZE]; MAX_GROUP_SIZE]; MAX_GROUPS],
            knockout: [0; BRACKET_SIZE],
        }
    }
}

impl GroupPhase {
    /// Empty slots are written as 0; 0xFF is accepted as well.
    pub fn is_empty_slot(value: u8) -> bool {
        value == SLOT_EMPTY || value == GROUP_NONE
    }

    /// Occupants of one group in slot order.
    pub fn members(&self, group: usize) -> impl Iterator<Item = u8> + '_ {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|slots| slots.iter().copied())
            .filter(|&idx| !Self::is_empty_slot(idx))
    }

    /// `(group, slot)` of an entity, if it was placed.
    pub fn placement(&self, entity_idx: u32) -> Option<(u8, u8)> {
        let i = entity_idx as usize;
        let group = *self.player_group.get(i)?;
        if group == GROUP_NONE {
            return None;
        }
        Some((group, self.player_slot[i]))
    }

    /// Put an entity into a group slot and keep the reverse lookup in step.
    pub fn place(&mut self, entity_idx: u32, group: usize, slot: usize) -> bool {
        let i = entity_idx as usize;
        if group >= MAX_GROUPS || slot >= MAX_GROUP_SIZE || i == 0 || i >= LOOKUP_LEN {
            return false;
        }

        // vacate the entity's previous cell
        if let Some((old_group, old_slot)) = self.placement(entity_idx) {
            if let Some(cell) = self
                .groups
                .get_mut(old_group as usize)
                .and_then(|g| g.get_mut(old_slot as usize))
            {
                if *cell == entity_idx as u8 {
                    *cell = SLOT_EMPTY;
                }
            }
        }

        // evict the current occupant
        let displaced = self.groups[group][slot] as usize;
        if displaced != i && self.placement(displaced as u32) == Some((group as u8, slot as u8)) {
            self.player_group[displaced] = GROUP_NONE;
            self.player_slot[displaced] = 0;
        }

        self.groups[group][slot] = entity_idx as u8;
        self.player_group[i] = group as u8;
        self.player_slot[i] = slot as u8;
        if group as u8 >= self.num_groups {
            self.num_groups = group as u8 + 1;
        }
        true
    }

    /// Clear assignment, scores and results. Sizing parameters survive.
    pub fn reset_groups(&mut self) {
        let keep = (self.group_size, self.advance_per_group);
        *self = Self::default();
        (self.group_size, self.advance_per_group) = keep;
    }

    /// Store a pairing score and its mirror entry, and tag both as decided.
    pub fn record_score(
        &mut self,
        group: usize,
        row: usize,
        col: usize,
        row_score: u16,
        col_score: u16,
    ) -> bool {
        if group >= MAX_GROUPS || row >= MAX_GROUP_SIZE || col >= MAX_GROUP_SIZE || row == col {
            return false;
        }

        let result = match row_score.cmp(&col_score) {
            std::cmp::Ordering::Greater => MatchResult::ROW_WIN,
            std::cmp::Ordering::Less => MatchResult::COL_WIN,
            std::cmp::Ordering::Equal => MatchResult::DRAW,
        };

        self.scores[group][row][col] = MatchScore { row_score, col_score };
        self.scores[group][col][row] = MatchScore { row_score: col_score, col_score: row_score };
        self.results[group][row][col] = result;
        self.results[group][col][row] = result.mirrored();
        true
    }

    /// Append the record at the end of `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut w = ByteWriter::new(buf);

        w.put_u8(self.num_groups);
        w.put_u8(self.group_size);
        w.put_u8(self.advance_per_group);
        for group in &self.groups {
            w.put_bytes(group);
        }
        w.put_bytes(&self.player_group);
        w.put_bytes(&self.player_slot);

        w.pad_to(SCORE_ALIGN);
        for score in self.scores.iter().flatten().flatten() {
            w.put_u16(score.row_score);
            w.put_u16(score.col_score);
        }

        w.pad_to(RESULT_ALIGN);
        for result in self.results.iter().flatten().flatten() {
            w.put_u32(result.0);
        }

        w.put_bytes(&self.knockout);
        w.pad_to(RESULT_ALIGN);
    }

    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        r.begin_record();
        let mut gp = Self {
            num_groups: r.get_u8()?,
            group_size: r.get_u8()?,
            advance_per_group: r.get_u8()?,
            ..Self::default()
        };

        for group in gp.groups.iter_mut() {
            *group = r.take_array()?;
        }
        gp.player_group = r.take_array()?;
        gp.player_slot = r.take_array()?;

        r.skip_to(SCORE_ALIGN)?;
        for score in gp.scores.iter_mut().flatten().flatten() {
            score.row_score = r.get_u16()?;
            score.col_score = r.get_u16()?;
        }

        r.skip_to(RESULT_ALIGN)?;
        for result in gp.results.iter_mut().flatten().flatten() {
            *result = MatchResult(r.get_u32()?);
        }

        gp.knockout = r.take_array()?;
        r.skip_to(RESULT_ALIGN)?;

        Ok(gp)
    }
}
