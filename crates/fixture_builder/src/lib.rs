//! Fixture Builder Library
//!
//! Reference rosters → olympiad save file → SHA256 checksum
//! Save file → verified summary

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use olympiad_core::save::summary::checksum;
use olympiad_core::{Olympiad, SaveConfig, SaveManager, SaveSummary, MAX_NUM_ENTITIES};
use serde::{Deserialize, Serialize};

/// Generation record written next to a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureMetadata {
    /// "reference" or "full"
    pub roster: String,
    /// Creation time (RFC3339)
    pub created_at: String,
    pub summary: SaveSummary,
}

/// (player, tournament) pairs registered in both rosters.
const REGISTRATIONS: [(&str, &str); 4] = [
    ("Alice", "Tennis"),
    ("Alice", "Chess"),
    ("Bob", "Tennis"),
    ("Charlie", "Chess"),
];

/// Three players, two tournaments.
pub fn reference_olympiad() -> Result<Olympiad> {
    build(&["Alice", "Bob", "Charlie"], &["Tennis", "Chess"])
}

/// Seventeen players and eighteen tournaments, same registrations as the
/// reference roster.
pub fn full_olympiad() -> Result<Olympiad> {
    let mut players = vec!["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()];
    players.extend((1..=14).map(|i| format!("Player{:02}", i)));

    let mut tournaments = vec!["Tennis".to_string(), "Chess".to_string()];
    tournaments.extend((1..=16).map(|i| format!("Torneo{:02}", i)));

    let players: Vec<&str> = players.iter().map(String::as_str).collect();
    let tournaments: Vec<&str> = tournaments.iter().map(String::as_str).collect();
    build(&players, &tournaments)
}

fn build(players: &[&str], tournaments: &[&str]) -> Result<Olympiad> {
    let mut olympiad = Olympiad::new(MAX_NUM_ENTITIES)?;
    for name in players {
        olympiad.add_player(name).with_context(|| format!("Failed to add player {}", name))?;
    }
    for name in tournaments {
        olympiad
            .add_tournament(name)
            .with_context(|| format!("Failed to add tournament {}", name))?;
    }
    for (player, tournament) in REGISTRATIONS {
        olympiad
            .register(player, tournament)
            .with_context(|| format!("Failed to register {} to {}", player, tournament))?;
    }
    Ok(olympiad)
}

/// Write a fixture save file.
///
/// # Arguments
///
/// * `out` - output save file path
/// * `full` - write the full roster instead of the reference one
pub fn generate(out: &Path, full: bool) -> Result<FixtureMetadata> {
    let olympiad = if full { full_olympiad()? } else { reference_olympiad()? };

    let summary = SaveManager::default()
        .save_olympiad(out, &olympiad)
        .with_context(|| format!("Failed to write save file: {}", out.display()))?;

    log::debug!("Fixture {} checksum {}", out.display(), summary.checksum);

    Ok(FixtureMetadata {
        roster: if full { "full" } else { "reference" }.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        summary,
    })
}

/// Load and verify a save file, then describe it.
pub fn inspect(path: &Path, lenient: bool) -> Result<SaveSummary> {
    let config = if lenient { SaveConfig::lenient() } else { SaveConfig::strict() };
    let (_, summary) = SaveManager::new(config)
        .load_with_summary(path)
        .with_context(|| format!("Failed to load save file: {}", path.display()))?;
    Ok(summary)
}

/// Compare a file against a known SHA256 checksum.
pub fn verify_fixture(path: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read save file: {}", path.display()))?;
    Ok(checksum(&bytes) == expected_checksum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use olympiad_core::EntityKind;
    use tempfile::TempDir;

    #[test]
    fn test_reference_fixture() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("olympiad.dat");

        let meta = generate(&out, false).unwrap();
        assert_eq!(meta.roster, "reference");
        assert_eq!(meta.summary.file_size, 1_153_202);
        assert_eq!(fs::metadata(&out).unwrap().len(), 1_153_202);
        assert!(verify_fixture(&out, &meta.summary.checksum).unwrap());

        let summary = inspect(&out, false).unwrap();
        assert_eq!(summary, meta.summary);
        assert_eq!(summary.players, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(summary.tournaments, vec!["Tennis", "Chess"]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.dat");
        let b = temp_dir.path().join("b.dat");

        let first = generate(&a, false).unwrap();
        let second = generate(&b, false).unwrap();
        assert_eq!(first.summary.checksum, second.summary.checksum);
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_full_roster() {
        let olympiad = full_olympiad().unwrap();
        assert_eq!(olympiad.player_count(), 17);
        assert_eq!(olympiad.tournament_count(), 18);
        assert_eq!(
            olympiad.registered_names(EntityKind::Tournament, "Tennis").unwrap(),
            vec!["Alice".to_string(), "Bob".to_string()]
        );
        assert!(olympiad.verify().is_ok());

        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("full.dat");
        let meta = generate(&out, true).unwrap();
        assert_eq!(meta.summary.player_count(), 17);
        assert_eq!(meta.summary.tournaments.last().map(String::as_str), Some("Torneo16"));
    }

    #[test]
    fn test_inspect_rejects_foreign_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("foreign.dat");
        fs::write(&path, b"definitely not a save file").unwrap();

        let err = inspect(&path, true).unwrap_err();
        assert!(err.to_string().contains("Failed to load save file"));
        assert!(!verify_fixture(&path, "00").unwrap());
    }
}
