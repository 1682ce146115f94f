use anyhow::ensure;
use clap::Args;
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::data_types::block_grid::DEFAULT_BLOCK_SIZE;
use crate::data_types::debug_level::DebugLevel;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct RunSettings {
    /// Filled in during settings checks so saved settings record the exact build
    #[clap(skip)]
    lcs_version: String,

    /// Number of ranks in the group
    #[clap(required = true)]
    #[clap(value_name = "PROCESSES")]
    pub processes: usize,

    /// Sequence A, laid out across the columns of the score matrix
    #[clap(required = true)]
    #[clap(value_name = "FILE_A")]
    pub sequence_a_fn: PathBuf,

    /// Sequence B, laid out down the rows of the score matrix
    #[clap(required = true)]
    #[clap(value_name = "FILE_B")]
    pub sequence_b_fn: PathBuf,

    /// Optional run summary (JSON, gzip if it ends in .gz)
    #[clap(long = "output-json")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_json: Option<PathBuf>,

    /// Edge length of a block; 0 makes the whole matrix one block
    #[clap(short = 'b')]
    #[clap(long = "block-size")]
    #[clap(value_name = "CELLS")]
    #[clap(help_heading = Some("Wavefront parameters"))]
    #[clap(default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Gathers the full score matrix on the root after the sweep
    #[clap(long = "reconstruct")]
    #[clap(help_heading = Some("Wavefront parameters"))]
    pub reconstruct: bool,

    /// Run as one process of an mpirun job instead of starting threads; PROCESSES must match the job size
    #[clap(long = "mpi")]
    #[clap(help_heading = Some("Wavefront parameters"))]
    pub mpi: bool,

    /// Cross-checks the distributed score against the sequential algorithm
    #[clap(long = "verify")]
    #[clap(help_heading = Some("Wavefront parameters"))]
    pub verify: bool,

    /// Extra debug output: step traces, or step traces plus a matrix dump
    #[clap(long = "debug-level")]
    #[clap(value_name = "LEVEL")]
    #[clap(default_value = "off")]
    pub debug_level: DebugLevel,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

pub fn check_run_settings(mut settings: RunSettings) -> anyhow::Result<RunSettings> {
    // hard code the version in
    settings.lcs_version = FULL_VERSION.clone();
    info!("lcs-wavefront version: {:?}", &settings.lcs_version);
    info!("Sub-command: run");
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.sequence_a_fn, "Sequence A")?;
    info!("\tSequence A: {:?}", &settings.sequence_a_fn);
    check_required_filename(&settings.sequence_b_fn, "Sequence B")?;
    info!("\tSequence B: {:?}", &settings.sequence_b_fn);

    // outputs
    info!("Outputs:");
    info!("\tRun summary: {:?}", &settings.output_json);

    info!("Wavefront parameters:");
    ensure!(settings.processes > 0, "PROCESSES must be >0");
    info!("\tProcesses: {}", settings.processes);
    ensure!(!settings.mpi || cfg!(feature = "mpi"), "--mpi requires a build with the \"mpi\" feature");
    info!("\tTransport: {}", if settings.mpi { "MPI" } else { "threads" });
    if settings.block_size == 0 {
        warn!("\tBlock size: 0, the whole matrix is a single block");
    } else {
        info!("\tBlock size: {}", settings.block_size);
    }
    info!("\tReconstruction: {}", if settings.reconstruct { "ENABLED" } else { "DISABLED" });
    info!("\tVerification: {}", if settings.verify { "ENABLED" } else { "DISABLED" });
    info!("\tDebug level: {}", settings.debug_level);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(processes: usize) -> RunSettings {
        RunSettings {
            processes,
            sequence_a_fn: PathBuf::from("Cargo.toml"),
            sequence_b_fn: PathBuf::from("Cargo.toml"),
            block_size: DEFAULT_BLOCK_SIZE,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_run_settings() {
        let checked = check_run_settings(settings(4)).unwrap();
        assert_eq!(checked.lcs_version, *FULL_VERSION);
        assert_eq!(checked.debug_level, DebugLevel::Off);
        assert!(check_run_settings(settings(0)).is_err());

        let mut missing = settings(2);
        missing.sequence_b_fn = PathBuf::from("/this/path/does/not/exist.txt");
        assert!(check_run_settings(missing).is_err());
    }

    #[test]
    fn test_mpi_flag() {
        let mut with_mpi = settings(2);
        with_mpi.mpi = true;
        assert_eq!(check_run_settings(with_mpi).is_ok(), cfg!(feature = "mpi"));
    }
}
