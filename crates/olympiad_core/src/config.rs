//! # Save Configuration
//!
//! Knobs for how strictly a save file is checked on the way in and out.
//!
//! ```rust
//! use olympiad_core::config::{RegistrationCheck, SaveConfig};
//!
//! let config = SaveConfig::default();
//! assert_eq!(config.registration_check, RegistrationCheck::Strict);
//! let relaxed = SaveConfig::lenient();
//! assert!(!relaxed.registration_check.rejects());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::registry::ListError;
use crate::save::SaveError;
use crate::MAX_NUM_ENTITIES;

/// What to do when a player's bitmap and a tournament's bitmap disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationCheck {
    /// Refuse to save, fail the load.
    #[default]
    Strict,
    /// Load anyway and log a warning.
    Lenient,
}

impl RegistrationCheck {
    pub fn rejects(self) -> bool {
        matches!(self, RegistrationCheck::Strict)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Slots per list for freshly created rosters
    pub capacity: u32,
    pub registration_check: RegistrationCheck,
    /// Run the list consistency pass after decoding
    pub verify_on_load: bool,
    /// Write through a temporary sibling file and rename
    pub atomic_write: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_NUM_ENTITIES,
            registration_check: RegistrationCheck::Strict,
            verify_on_load: true,
            atomic_write: true,
        }
    }
}

impl SaveConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    /// Accepts files from older tools that only set one side of a
    /// registration.
    pub fn lenient() -> Self {
        Self { registration_check: RegistrationCheck::Lenient, ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SaveError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ListError> {
        if self.capacity > MAX_NUM_ENTITIES {
            return Err(ListError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_NUM_ENTITIES,
            });
        }
        Ok(())
    }
}
