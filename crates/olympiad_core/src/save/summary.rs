use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::registry::{EntityList, Olympiad};

use super::SAVE_VERSION;

/// What a save file holds, without the slot arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub version: u32,
    pub players_capacity: u32,
    pub tournaments_capacity: u32,
    /// Active player names in list order
    pub players: Vec<String>,
    /// Active tournament names in list order
    pub tournaments: Vec<String>,
    pub file_size: usize,
    /// SHA256 of the file bytes (hex)
    pub checksum: String,
}

impl SaveSummary {
    pub fn new(olympiad: &Olympiad, bytes: &[u8]) -> Self {
        Self::from_lists(&olympiad.players, &olympiad.tournaments, bytes)
    }

    pub fn from_lists(players: &EntityList, tournaments: &EntityList, bytes: &[u8]) -> Self {
        Self {
            version: SAVE_VERSION,
            players_capacity: players.capacity(),
            tournaments_capacity: tournaments.capacity(),
            players: players.names().map(str::to_string).collect(),
            tournaments: tournaments.names().map(str::to_string).collect(),
            file_size: bytes.len(),
            checksum: checksum(bytes),
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn tournament_count(&self) -> usize {
        self.tournaments.len()
    }

    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.file_size == bytes.len() && self.checksum == checksum(bytes)
    }
}

pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
