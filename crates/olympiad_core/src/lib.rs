//! # olympiad_core - Olympiad Manager State and Save File
//!
//! Players and events live in two fixed-capacity entity lists. Each list is
//! an index-linked ring over a slot array with its own free chain, so the
//! whole state serializes to a flat, C-compatible binary file.
//!
//! ## Features
//! - O(1) allocate/release with slot reuse
//! - Cross registration between lists through 64-bit bitmaps
//! - Byte-exact group phase records (padding computed by hand)
//! - Atomic save, validated load, optional consistency pass

// Loop style - byte buffers are indexed by offset
#![allow(clippy::needless_range_loop)]

pub mod codec;
pub mod config;
pub mod group_phase;
pub mod layout;
pub mod registry;
pub mod save;

pub use codec::CodecError;
pub use config::{RegistrationCheck, SaveConfig};
pub use group_phase::{GroupPhase, MatchResult, MatchScore};
pub use registry::{
    CompetitionFormat, Entity, EntityKind, EntityList, ListError, Medal, Olympiad, Phase,
    Registrations,
};
pub use save::{SaveError, SaveFile, SaveManager, SaveSummary};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of usable slots per list in the reference instance. Also the
/// hard upper bound, since a registration bitmap has 64 bits.
pub const MAX_NUM_ENTITIES: u32 = 64;

/// Heap-ordered single elimination bracket: 64 leaves + 63 inner nodes.
pub const BRACKET_SIZE: usize = 127;

pub const MAX_GROUPS: usize = 16;
pub const MAX_GROUP_SIZE: usize = 8;

/// "Not placed" marker in the group phase reverse lookup tables.
pub const GROUP_NONE: u8 = 0xFF;
