//! Player and tournament registries.
//!
//! Both categories share one fixed-capacity list type; the roster ties a
//! players list and a tournaments list together through registration
//! bitmaps.

pub mod bitset;
pub mod entity;
pub mod entity_list;
pub mod error;
pub mod roster;

pub use bitset::{bit_to_index, index_to_bit, Registrations};
pub use entity::{CompetitionFormat, Entity, Medal, Phase};
pub use entity_list::{ActiveIter, EntityKind, EntityList};
pub use error::ListError;
pub use roster::{check_registration_symmetry, Olympiad};
