//! Fixture Builder CLI
//!
//! Reference roster → olympiad save file
//! Save file → verified summary (optionally as JSON)

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fixture_builder")]
#[command(about = "Generate and inspect olympiad save files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Write a fixture save file
    Generate {
        /// Output save file path
        #[arg(long)]
        out: PathBuf,

        /// Write the 17 player / 18 tournament roster
        #[arg(long, default_value = "false")]
        full: bool,

        /// Verify the file checksum after writing
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Load a save file and print what it holds
    Inspect {
        /// Save file path
        #[arg(long)]
        path: PathBuf,

        /// Accept one-sided registrations
        #[arg(long, default_value = "false")]
        lenient: bool,

        /// Output summary JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { out, full, verify, metadata } => {
            println!("Generating {} fixture...", if full { "full" } else { "reference" });
            println!("   Output: {}", out.display());

            let meta = fixture_builder::generate(&out, full)?;

            print_summary(&meta.summary);
            println!("   Created:      {}", meta.created_at);

            if verify {
                verify_checksum(&out, &meta.summary.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                write_json(&metadata_path, &meta)?;
            }
        }

        Commands::Inspect { path, lenient, json } => {
            println!("Inspecting {}...", path.display());

            let summary = fixture_builder::inspect(&path, lenient)?;

            print_summary(&summary);

            if let Some(json_path) = json {
                write_json(&json_path, &summary)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_summary(summary: &olympiad_core::SaveSummary) {
    println!("\nSave file v{}", summary.version);
    println!("   Size:         {} bytes", summary.file_size);
    println!(
        "   Players:      {}/{} {:?}",
        summary.player_count(),
        summary.players_capacity,
        summary.players
    );
    println!(
        "   Tournaments:  {}/{} {:?}",
        summary.tournament_count(),
        summary.tournaments_capacity,
        summary.tournaments
    );
    println!("   Checksum:     {}", summary.checksum);
}

#[cfg(feature = "cli")]
fn verify_checksum(path: &Path, checksum: &str) -> Result<()> {
    println!("\nVerifying checksum...");
    if fixture_builder::verify_fixture(path, checksum)? {
        println!("Checksum verification passed");
        Ok(())
    } else {
        anyhow::bail!("Checksum verification failed for {}", path.display())
    }
}

#[cfg(feature = "cli")]
fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    println!("\nJSON saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("fixture_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
