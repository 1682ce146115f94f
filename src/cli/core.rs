use anyhow::bail;
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use std::path::Path;

use crate::cli::profile::ProfileSettings;
use crate::cli::run::RunSettings;
use crate::cli::shared::SharedSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.3.1-6bb9635-dirty` - while on a dirty branch
    /// * `0.3.1-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string with the license notice.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2023-{}     lcs-wavefront developers
Distributed under the MIT license; this program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year());
}

#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// lcs-wavefront, longest common subsequence scoring on a block wavefront.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Scores two sequences with the distributed block wavefront across a group of ranks
    Run(Box<RunSettings>),
    /// Scores two sequences with the single process anti-diagonal sweep
    Shared(Box<SharedSettings>),
    /// Profiles the sequential algorithm phase by phase and estimates parallel speedup
    Profile(Box<ProfileSettings>)
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }

    // file exists
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_file() {
        assert!(check_required_filename(Path::new("/this/path/does/not/exist.txt"), "Sequence A").is_err());
        assert!(check_required_filename(Path::new("Cargo.toml"), "Manifest").is_ok());
    }
}
