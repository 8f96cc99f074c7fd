use thiserror::Error;

use super::entity_list::EntityKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("{kind} list is full ({capacity} slots)")]
    CapacityExceeded { kind: EntityKind, capacity: u32 },

    #[error("Invalid {kind} index: {index}")]
    InvalidIndex { kind: EntityKind, index: u32 },

    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("Invalid capacity {capacity} (max {max})")]
    InvalidCapacity { capacity: u32, max: u32 },

    #[error("Corruption detected in {kind} list: {reason}")]
    Corruption { kind: EntityKind, reason: String },
}

impl ListError {
    /// Caller can evict, rename or pick another entity and try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ListError::CapacityExceeded { .. } => true,
            ListError::NotFound { .. } => true,
            ListError::DuplicateName { .. } => true,
            ListError::InvalidIndex { .. } => false,
            ListError::InvalidCapacity { .. } => false,
            ListError::Corruption { .. } => false,
        }
    }
}
