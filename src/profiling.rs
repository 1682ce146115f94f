/*!
# Profiling module
Times the sequential LCS phase by phase over repeated runs.
The spread across runs and the share of the DP fill feed an Amdahl's law estimate of what parallel engines can win.
*/
use anyhow::ensure;
use indicatif::ProgressIterator;
use log::debug;
use std::time::Instant;

use crate::data_types::profile_stats::{PhaseTimings, ProfileStats};
use crate::data_types::score_grid::{ScoreGrid, ScoreType};
use crate::data_types::sequence_pair::SequencePair;
use crate::util::progress_bar::styled_bar;
use crate::wavefront::kernel::fill_block;

/// Default number of timed runs
pub const DEFAULT_PROFILE_RUNS: usize = 20;

/// One timed sequential run over the full matrix
/// # Errors
/// * if the matrix shape does not match the sequences, which would be a bug
pub fn timed_run(pair: &SequencePair) -> anyhow::Result<(PhaseTimings, ScoreType)> {
    let (seq_a, seq_b) = (pair.seq_a(), pair.seq_b());
    let start_time = Instant::now();

    let mut matrix = ScoreGrid::new(seq_b.len() + 1, seq_a.len() + 1);
    let alloc = start_time.elapsed().as_secs_f64();

    let init_time = Instant::now();
    matrix.zero_borders();
    let init = init_time.elapsed().as_secs_f64();

    let compute_time = Instant::now();
    fill_block(&mut matrix, seq_a, seq_b)?;
    let score = matrix.last().unwrap_or_default();
    let compute = compute_time.elapsed().as_secs_f64();

    drop(matrix);
    let total = start_time.elapsed().as_secs_f64();
    Ok((PhaseTimings { alloc, init, compute, total }, score))
}

/// Repeats `timed_run` and aggregates the timings.
/// # Arguments
/// * `pair` - the loaded sequences
/// * `runs` - number of timed runs
/// * `file_io` - seconds it took to load `pair`, which only happens once
/// * `show_progress` - if true, a progress bar tracks the runs
/// # Returns
/// * the statistics and the LCS score
/// # Errors
/// * if `runs` is 0
pub fn profile_pair(pair: &SequencePair, runs: usize, file_io: f64, show_progress: bool) -> anyhow::Result<(ProfileStats, ScoreType)> {
    ensure!(runs > 0, "At least one profiling run is required");

    let mut timings = Vec::with_capacity(runs);
    let mut score = 0;
    let iter: Box<dyn Iterator<Item = usize>> = if show_progress {
        Box::new((0..runs).progress_with(styled_bar(runs as u64, "profiling runs")))
    } else {
        Box::new(0..runs)
    };
    for run in iter {
        let (timing, run_score) = timed_run(pair)?;
        debug!("Run #{run}: {timing:?}");
        timings.push(timing);
        score = run_score;
    }

    let stats = ProfileStats::from_timings(pair.seq_a().len(), pair.seq_b().len(), file_io, &timings);
    Ok((stats, score))
}
