use log::{LevelFilter, debug, error, info};
use std::time::Instant;

use lcs_wavefront::cli::core::{Commands, FULL_VERSION, get_cli};
use lcs_wavefront::cli::profile::{ProfileSettings, check_profile_settings};
use lcs_wavefront::cli::run::{RunSettings, check_run_settings};
use lcs_wavefront::cli::shared::{SharedSettings, check_shared_settings};
use lcs_wavefront::parsing::sequence_file::load_sequence_pair;
use lcs_wavefront::profiling::profile_pair;
use lcs_wavefront::util::sequence_alignment::lcs_length;
use lcs_wavefront::data_types::sequence_pair::SequencePair;
use lcs_wavefront::wavefront::launcher::{WavefrontReport, launch};
use lcs_wavefront::wavefront::scheduler::{WavefrontConfig, WavefrontConfigBuilder};
use lcs_wavefront::wavefront::shared::anti_diagonal_lcs;
use lcs_wavefront::writers::profile_table::write_profile_table;
use lcs_wavefront::writers::run_summary::RunSummary;

/// Sets up logging before we check the other settings
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Dumps the checked settings at debug level
fn log_settings<T: serde::Serialize>(settings: &T) {
    match serde_json::to_string(settings) {
        Ok(json) => debug!("Settings: {json}"),
        Err(e) => debug!("Settings could not be serialized: {e}")
    }
}

#[cfg(feature = "mpi")]
fn launch_mpi_job<F>(processes: usize, config: WavefrontConfig, source: F) -> anyhow::Result<Option<WavefrontReport>>
where
    F: FnOnce() -> anyhow::Result<SequencePair>
{
    lcs_wavefront::wavefront::launcher::launch_mpi(processes, config, source)
}

#[cfg(not(feature = "mpi"))]
fn launch_mpi_job<F>(_processes: usize, _config: WavefrontConfig, _source: F) -> anyhow::Result<Option<WavefrontReport>>
where
    F: FnOnce() -> anyhow::Result<SequencePair>
{
    anyhow::bail!("This build does not include MPI support")
}

fn run_wavefront(settings: RunSettings) {
    init_logging(settings.verbosity);

    let settings = match check_run_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    log_settings(&settings);

    // build our configuration
    let wavefront_config = match WavefrontConfigBuilder::default()
        .block_size(settings.block_size)
        .debug_level(settings.debug_level)
        .reconstruct(settings.reconstruct)
        .build() {
        Ok(wc) => wc,
        Err(e) => {
            error!("Error while building wavefront config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    // the root rank is the only one that reads files
    let (filename_a, filename_b) = (settings.sequence_a_fn.clone(), settings.sequence_b_fn.clone());
    let source = move || load_sequence_pair(&filename_a, &filename_b);
    let launched = if settings.mpi {
        launch_mpi_job(settings.processes, wavefront_config, source)
    } else {
        info!("Launching {} ranks...", settings.processes);
        launch(settings.processes, wavefront_config, source).map(Some)
    };
    let report = match launched {
        // other MPI processes leave the reporting to the root
        Ok(None) => return,
        Ok(Some(r)) => r,
        Err(e) => {
            error!("Error while running the wavefront: {e:#}");
            let code = if e.chain().any(|cause| cause.downcast_ref::<std::io::Error>().is_some()) {
                exitcode::IOERR
            } else {
                exitcode::SOFTWARE
            };
            std::process::exit(code);
        }
    };

    for rank in report.ranks.iter() {
        debug!("R#{}: {} blocks in {:.6} seconds", rank.rank, rank.blocks_computed, rank.compute_seconds);
    }

    if let Some(matrix) = report.matrix.as_ref() {
        if settings.debug_level.dumps_matrix() {
            println!("{}", matrix.render(report.sequences.seq_a(), report.sequences.seq_b()));
        }
        if matrix.last() != Some(report.score) {
            error!("Reconstructed matrix ends in {:?}, but the reported score is {}", matrix.last(), report.score);
            std::process::exit(exitcode::SOFTWARE);
        }
        info!("Reconstructed matrix agrees with the reported score.");
    }

    if settings.verify {
        info!("Verifying against the sequential algorithm...");
        let expected = lcs_length(report.sequences.seq_a(), report.sequences.seq_b());
        if expected != usize::from(report.score) {
            error!("Verification failed: sequential score is {expected}, distributed score is {}", report.score);
            std::process::exit(exitcode::SOFTWARE);
        }
        info!("Verification passed.");
    }

    if let Some(json_fn) = settings.output_json.as_deref() {
        info!("Saving run summary to {json_fn:?}...");
        let summary = RunSummary::from_report(&report, &FULL_VERSION);
        if let Err(e) = summary.write(json_fn) {
            error!("Error while saving run summary: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    println!("Score: {}", report.score);
    println!("PARALLEL: {:.6}s", report.elapsed_seconds);
}

fn run_shared(settings: SharedSettings) {
    init_logging(settings.verbosity);

    let settings = match check_shared_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    log_settings(&settings);

    // set up the number of threads for rayon
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };

    info!("Loading sequences...");
    let pair = match load_sequence_pair(&settings.sequence_a_fn, &settings.sequence_b_fn) {
        Ok(p) => p,
        Err(e) => {
            error!("Error while loading sequences: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    info!("Sweeping anti-diagonals...");
    let start_time = Instant::now();
    let score = anti_diagonal_lcs(pair.seq_a(), pair.seq_b());
    let elapsed = start_time.elapsed().as_secs_f64();

    println!("Score: {score}");
    println!("PARALLEL: {elapsed:.6}s");
}

fn run_profile(settings: ProfileSettings) {
    init_logging(settings.verbosity);

    let settings = match check_profile_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    log_settings(&settings);

    // file loading is only timed once
    info!("Loading sequences...");
    let start_time = Instant::now();
    let pair = match load_sequence_pair(&settings.sequence_a_fn, &settings.sequence_b_fn) {
        Ok(p) => p,
        Err(e) => {
            error!("Error while loading sequences: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let file_io = start_time.elapsed().as_secs_f64();

    info!(
        "Starting {} profiling runs for sequences of size {} and {}...",
        settings.runs, pair.seq_a().len(), pair.seq_b().len()
    );
    let (stats, score) = match profile_pair(&pair, settings.runs, file_io, true) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while profiling: {e:#}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };
    info!("Profiling runs completed.");

    println!("{}", stats.render());

    if let Some(tsv_fn) = settings.output_tsv.as_deref() {
        info!("Saving profiling table to {tsv_fn:?}...");
        if let Err(e) = write_profile_table(&stats, tsv_fn) {
            error!("Error while saving profiling table: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    println!("Score: {score}");
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Run(settings) => {
            run_wavefront(*settings);
        },
        Commands::Shared(settings) => {
            run_shared(*settings);
        },
        Commands::Profile(settings) => {
            run_profile(*settings);
        }
    }

    info!("Process finished successfully.");
}
