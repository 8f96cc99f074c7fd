use super::error::SaveError;
use super::format::SaveFile;
use super::summary::SaveSummary;

use crate::config::SaveConfig;
use crate::registry::{check_registration_symmetry, EntityList, ListError, Olympiad};

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Reads and writes save files according to a [`SaveConfig`].
#[derive(Debug, Clone, Default)]
pub struct SaveManager {
    config: SaveConfig,
}

impl SaveManager {
    pub fn new(config: SaveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// Fresh roster sized by the configured capacity.
    pub fn new_olympiad(&self) -> Result<Olympiad, SaveError> {
        Ok(Olympiad::new(self.config.capacity)?)
    }

    pub fn save(
        &self,
        path: &Path,
        players: &EntityList,
        tournaments: &EntityList,
    ) -> Result<SaveSummary, SaveError> {
        if self.config.registration_check.rejects() {
            check_registration_symmetry(players, tournaments).map_err(corruption)?;
        }

        let data = SaveFile::encode(players, tournaments)?;
        self.write_file(path, &data)?;

        let summary = SaveSummary::from_lists(players, tournaments, &data);
        log::info!(
            "Saved {} players and {} tournaments to {:?}",
            summary.player_count(),
            summary.tournament_count(),
            path
        );
        Ok(summary)
    }

    pub fn save_olympiad(&self, path: &Path, olympiad: &Olympiad) -> Result<SaveSummary, SaveError> {
        self.save(path, &olympiad.players, &olympiad.tournaments)
    }

    pub fn load(&self, path: &Path) -> Result<Olympiad, SaveError> {
        self.load_with_summary(path).map(|(olympiad, _)| olympiad)
    }

    /// Load, verify per config, and describe what was read.
    pub fn load_with_summary(&self, path: &Path) -> Result<(Olympiad, SaveSummary), SaveError> {
        let data = Self::read_file(path)?;
        let olympiad = SaveFile::from_bytes(&data)?.into_olympiad();

        if self.config.verify_on_load {
            olympiad.players.verify().map_err(corruption)?;
            olympiad.tournaments.verify().map_err(corruption)?;
        }

        if let Err(err) = olympiad.check_registration_symmetry() {
            if self.config.registration_check.rejects() {
                return Err(corruption(err));
            }
            log::warn!("Loaded {:?} with inconsistent registrations: {}", path, err);
        }

        let summary = SaveSummary::new(&olympiad, &data);
        log::info!(
            "Loaded {} players and {} tournaments from {:?}",
            summary.player_count(),
            summary.tournament_count(),
            path
        );
        Ok((olympiad, summary))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !self.config.atomic_write {
            let mut file = File::create(path)?;
            file.write_all(data)?;
            file.sync_all()?;
            log::debug!("Saved {} bytes to {:?}", data.len(), path);
            return Ok(());
        }

        // Atomic save: write to temp file, then rename
        let temp_path = temp_path_for(path);

        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(data)?;
            file.flush()?;
            file.sync_all()
        });

        if let Err(err) = written.and_then(|_| rename(&temp_path, path)) {
            if let Err(cleanup) = remove_file(&temp_path) {
                log::debug!("Could not remove {:?}: {}", temp_path, cleanup);
            }
            return Err(err.into());
        }

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn read_file(path: &Path) -> Result<Vec<u8>, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(data)
    }
}

/// Sibling path with `.tmp` appended to the full file name.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn corruption(err: ListError) -> SaveError {
    SaveError::Corruption(err.to_string())
}
