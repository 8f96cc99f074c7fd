//! One slot of an entity list and its binary record.

use crate::codec::{ByteReader, ByteWriter, CodecError};
use crate::group_phase::GroupPhase;
use crate::BRACKET_SIZE;

use super::bitset::Registrations;

/// Stage of competition of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Registration = 0,
    Group = 1,
    Knockout = 2,
    Finished = 3,
}

impl Phase {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Phase::Registration),
            1 => Some(Phase::Group),
            2 => Some(Phase::Knockout),
            3 => Some(Phase::Finished),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CompetitionFormat {
    Knockout = 0,
    GroupKnockout = 1,
    RoundRobin = 2,
}

impl CompetitionFormat {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(CompetitionFormat::Knockout),
            1 => Some(CompetitionFormat::GroupKnockout),
            2 => Some(CompetitionFormat::RoundRobin),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn uses_groups(self) -> bool {
        !matches!(self, CompetitionFormat::Knockout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Medal {
    Gold = 0,
    Silver = 1,
    Bronze = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub next: u32,
    pub prev: u32,
    pub name: String,
    pub registrations: Registrations,
    pub medals: [u8; 3],
    /// Raw [`Phase`] tag
    pub phase: u8,
    /// Raw [`CompetitionFormat`] tag
    pub format: u8,
    pub bracket: [u8; BRACKET_SIZE],
    pub group_phase: GroupPhase,
}

impl Default for Entity {
    fn default() -> Self {
        Self::vacant(0, 0)
    }
}

impl Entity {
    /// Slot with links and an empty payload.
    pub fn vacant(next: u32, prev: u32) -> Self {
        Self {
            next,
            prev,
            name: String::new(),
            registrations: Registrations::EMPTY,
            medals: [0; 3],
            phase: Phase::Registration.tag(),
            format: CompetitionFormat::Knockout.tag(),
            bracket: [0; BRACKET_SIZE],
            group_phase: GroupPhase::default(),
        }
    }

    /// Drop the payload, keep the links.
    pub fn reset_payload(&mut self) {
        *self = Self::vacant(self.next, self.prev);
    }

    /// Fields that must stay empty on sentinels and free slots.
    pub fn has_empty_identity(&self) -> bool {
        self.name.is_empty() && self.registrations.is_empty() && self.medals == [0; 3]
    }

    pub fn phase(&self) -> Option<Phase> {
        Phase::from_tag(self.phase)
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase.tag();
    }

    pub fn format(&self) -> Option<CompetitionFormat> {
        CompetitionFormat::from_tag(self.format)
    }

    pub fn set_format(&mut self, format: CompetitionFormat) {
        self.format = format.tag();
    }

    pub fn medal(&self, medal: Medal) -> u8 {
        self.medals[medal as usize]
    }

    /// Size of this record once encoded.
    pub fn encoded_len(&self) -> usize {
        crate::layout::ENTITY_FIXED_SIZE + self.name.len()
    }

    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        {
            let mut w = ByteWriter::new(buf);
            w.put_u32(self.next);
            w.put_u32(self.prev);
            w.put_str(&self.name)?;
            w.put_u64(self.registrations.bits());
            w.put_bytes(&self.medals);
            w.put_u8(self.phase);
            w.put_u8(self.format);
            w.put_bytes(&self.bracket);
        }
        self.group_phase.encode(buf);
        Ok(())
    }

    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            next: r.get_u32()?,
            prev: r.get_u32()?,
            name: r.get_str()?,
            registrations: Registrations(r.get_u64()?),
            medals: r.take_array()?,
            phase: r.get_u8()?,
            format: r.get_u8()?,
            bracket: r.take_array()?,
            group_phase: GroupPhase::decode(r)?,
        })
    }
}
