use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct SharedSettings {
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

    /// Number of threads sharing each anti-diagonal
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

pub fn check_shared_settings(mut settings: SharedSettings) -> anyhow::Result<SharedSettings> {
    // hard code the version in
    settings.lcs_version = FULL_VERSION.clone();
    info!("lcs-wavefront version: {:?}", &settings.lcs_version);
    info!("Sub-command: shared");
    info!("Inputs:");

    check_required_filename(&settings.sequence_a_fn, "Sequence A")?;
    info!("\tSequence A: {:?}", &settings.sequence_a_fn);
    check_required_filename(&settings.sequence_b_fn, "Sequence B")?;
    info!("\tSequence B: {:?}", &settings.sequence_b_fn);

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threads() {
        let settings = SharedSettings {
            sequence_a_fn: PathBuf::from("Cargo.toml"),
            sequence_b_fn: PathBuf::from("Cargo.toml"),
            threads: 0,
            ..Default::default()
        };
        assert_eq!(check_shared_settings(settings).unwrap().threads, 1);
    }
}
