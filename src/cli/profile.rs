use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::profiling::DEFAULT_PROFILE_RUNS;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct ProfileSettings {
    /// Filled in during settings checks so saved settings record the exact build
    #[clap(skip)]
    lcs_version: String,

    /// Sequence A, laid out across the columns of the score matrix
    #[clap(required = true)]
    #[clap(value_name = "FILE_A")]
    pub sequence_a_fn: PathBuf,

    /// Sequence B, laid out down the rows of the score matrix
    #[clap(required = true)]
    #[clap(value_name = "FILE_B")]
    pub sequence_b_fn: PathBuf,

    /// Optional profiling table (CSV/TSV)
    #[clap(long = "output-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_tsv: Option<PathBuf>,

    /// Number of timed runs
    #[clap(long = "runs")]
    #[clap(value_name = "RUNS")]
    #[clap(help_heading = Some("Profiling parameters"))]
    #[clap(default_value_t = DEFAULT_PROFILE_RUNS)]
    pub runs: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

pub fn check_profile_settings(mut settings: ProfileSettings) -> anyhow::Result<ProfileSettings> {
    // hard code the version in
    settings.lcs_version = FULL_VERSION.clone();
    info!("lcs-wavefront version: {:?}", &settings.lcs_version);
    info!("Sub-command: profile");
    info!("Inputs:");

    check_required_filename(&settings.sequence_a_fn, "Sequence A")?;
    info!("\tSequence A: {:?}", &settings.sequence_a_fn);
    check_required_filename(&settings.sequence_b_fn, "Sequence B")?;
    info!("\tSequence B: {:?}", &settings.sequence_b_fn);

    info!("Outputs:");
    info!("\tProfiling table: {:?}", &settings.output_tsv);

    info!("Profiling parameters:");
    ensure!(settings.runs > 0, "--runs must be >0");
    info!("\tRuns: {}", settings.runs);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_runs() {
        let settings = ProfileSettings {
            sequence_a_fn: PathBuf::from("Cargo.toml"),
            sequence_b_fn: PathBuf::from("Cargo.toml"),
            runs: 0,
            ..Default::default()
        };
        assert!(check_profile_settings(settings.clone()).is_err());
        let settings = ProfileSettings { runs: 3, ..settings };
        assert_eq!(check_profile_settings(settings).unwrap().runs, 3);
    }
}
