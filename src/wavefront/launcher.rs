use anyhow::{Context, anyhow, ensure};
use log::{debug, error};
use serde::Serialize;
use std::thread;
use std::time::Instant;

use crate::comm::local::{AbortHandle, local_group};
use crate::comm::{CommError, Communicator, ROOT_RANK, Tag};
use crate::data_types::block_grid::{BlockGrid, PartitionError};
use crate::data_types::score_grid::{ScoreGrid, ScoreType};
use crate::data_types::sequence_pair::{SequencePair, check_score_capacity};
use crate::wavefront::scheduler::{RankReport, WavefrontConfig, run_rank};

/// Per-rank facts kept after a run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankSummary {
    pub rank: usize,
    pub blocks_computed: usize,
    pub compute_seconds: f64
}

impl From<&RankReport> for RankSummary {
    fn from(report: &RankReport) -> Self {
        Self {
            rank: report.rank,
            blocks_computed: report.blocks_computed,
            compute_seconds: report.compute_seconds
        }
    }
}

/// Result of a full wavefront run, as seen from the root
#[derive(Clone, Debug)]
pub struct WavefrontReport {
    /// The LCS length
    pub score: ScoreType,
    /// The block grid every rank used
    pub grid: BlockGrid,
    /// One entry per rank, in rank order
    pub ranks: Vec<RankSummary>,
    /// The gathered score matrix, if gathering was enabled
    pub matrix: Option<ScoreGrid>,
    /// Wall-clock seconds for the whole group, startup broadcast included
    pub elapsed_seconds: f64,
    /// The inputs as loaded by the root
    pub sequences: SequencePair
}

/// Aborts the group if the owning rank unwinds from a panic
struct AbortOnPanic(AbortHandle);

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort();
        }
    }
}

/// Runs the distributed wavefront on `world_size` ranks, each on its own thread.
/// Only the root calls `source`; the loaded sequences reach the other ranks through the startup broadcast.
/// Any rank failing aborts the whole group, and no partial result is returned.
/// # Arguments
/// * `world_size` - number of ranks
/// * `config` - run options handed to every rank
/// * `source` - loads the two sequences on the root
/// # Errors
/// * if `world_size` is 0
/// * if loading fails or any rank fails; the first error that is not a plain abort is reported
pub fn launch<F>(world_size: usize, config: WavefrontConfig, source: F) -> anyhow::Result<WavefrontReport>
where
    F: FnOnce() -> anyhow::Result<SequencePair> + Send
{
    if world_size == 0 {
        return Err(PartitionError::EmptyWorld.into());
    }

    let start_time = Instant::now();
    let group = local_group(world_size);
    let mut source = Some(source);
    let results: Vec<anyhow::Result<(RankReport, Option<SequencePair>)>> = thread::scope(|scope| {
        let handles: Vec<_> = group.into_iter()
            .map(|mut comm| {
                let rank_source = if comm.is_root() { source.take() } else { None };
                let config = &config;
                scope.spawn(move || {
                    let _guard = AbortOnPanic(comm.abort_handle());
                    let result = rank_main(&mut comm, rank_source, config);
                    if let Err(e) = result.as_ref() {
                        if !is_abort(e) {
                            error!("Rank {} failed: {e:#}", comm.rank());
                        }
                        comm.abort();
                    }
                    result
                })
            })
            .collect();

        handles.into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle.join().unwrap_or_else(|_| Err(anyhow!("Rank {rank} panicked")))
            })
            .collect()
    });
    let elapsed_seconds = start_time.elapsed().as_secs_f64();

    // report the root cause rather than the aborts it triggered
    let mut reports = Vec::with_capacity(world_size);
    let mut first_abort = None;
    let mut root_sequences = None;
    for result in results {
        match result {
            Ok((report, sequences)) => {
                if sequences.is_some() {
                    root_sequences = sequences;
                }
                reports.push(report);
            },
            Err(e) if is_abort(&e) => {
                if first_abort.is_none() {
                    first_abort = Some(e);
                }
            },
            Err(e) => return Err(e)
        }
    }
    if let Some(e) = first_abort {
        return Err(e);
    }

    let sequences = root_sequences.context("Root rank returned no sequences")?;
    let root_report = reports.iter_mut()
        .find(|r| r.rank == ROOT_RANK)
        .context("Root rank returned no report")?;
    let score = root_report.final_score.context("Root rank has no final score")?;
    let matrix = root_report.matrix.take();
    let grid = BlockGrid::new(sequences.seq_a().len(), sequences.seq_b().len(), config.block_size(), world_size)?;

    Ok(WavefrontReport {
        score,
        grid,
        ranks: reports.iter().map(RankSummary::from).collect(),
        matrix,
        elapsed_seconds,
        sequences
    })
}

/// Runs the wavefront as one process of an `mpirun` launched job.
/// Every process calls this; only the root calls `source` and gets a report back.
/// A failing process logs its error and aborts the whole job.
/// # Arguments
/// * `world_size` - the process count the user asked for, checked against the MPI world
/// * `config` - run options, identical on every process
/// * `source` - loads the two sequences on the root
/// # Errors
/// * if MPI cannot be initialized
#[cfg(feature = "mpi")]
pub fn launch_mpi<F>(world_size: usize, config: WavefrontConfig, source: F) -> anyhow::Result<Option<WavefrontReport>>
where
    F: FnOnce() -> anyhow::Result<SequencePair>
{
    let mut comm = crate::comm::mpi::MpiComm::initialize()?;
    let result = if comm.size() == world_size {
        let source = if comm.is_root() { Some(source) } else { None };
        run_member(&mut comm, source, &config)
    } else {
        Err(anyhow!("Asked for {world_size} processes, but MPI started {}", comm.size()))
    };

    if let Err(e) = result.as_ref() {
        error!("Rank {} failed: {e:#}", comm.rank());
        comm.abort();
    }
    result
}

/// One member's share of a run whose ranks cannot see each other's results.
/// After the sweep every rank reports its counters to the root, which assembles the full report.
/// # Returns
/// * the report on the root, None everywhere else
/// # Errors
/// * if this rank's part of the run fails
pub fn run_member<C, F>(comm: &mut C, source: Option<F>, config: &WavefrontConfig) -> anyhow::Result<Option<WavefrontReport>>
where
    C: Communicator + ?Sized,
    F: FnOnce() -> anyhow::Result<SequencePair>
{
    let start_time = Instant::now();
    let (mut report, sequences) = rank_main(comm, source, config)?;
    let ranks = gather_rank_summaries(comm, &report)?;

    let (Some(ranks), Some(sequences)) = (ranks, sequences) else {
        return Ok(None);
    };
    let score = report.final_score.context("Root rank has no final score")?;
    let grid = BlockGrid::new(sequences.seq_a().len(), sequences.seq_b().len(), config.block_size(), comm.size())?;
    Ok(Some(WavefrontReport {
        score,
        grid,
        ranks,
        matrix: report.matrix.take(),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
        sequences
    }))
}

/// Collects every rank's work counters on the root, in rank order.
/// Seconds travel as the bit pattern of the `f64`.
/// # Returns
/// * all summaries on the root, None everywhere else
pub fn gather_rank_summaries<C: Communicator + ?Sized>(
    comm: &mut C, report: &RankReport
) -> anyhow::Result<Option<Vec<RankSummary>>> {
    if !comm.is_root() {
        comm.send_counts(ROOT_RANK, Tag::RankSummary, vec![report.blocks_computed as u64, report.compute_seconds.to_bits()])?;
        return Ok(None);
    }

    let mut summaries = Vec::with_capacity(comm.size());
    for rank in 0..comm.size() {
        if rank == comm.rank() {
            summaries.push(RankSummary::from(report));
        } else {
            let counts = comm.recv_counts(rank, Tag::RankSummary, 2)?;
            summaries.push(RankSummary {
                rank,
                blocks_computed: usize::try_from(counts[0])?,
                compute_seconds: f64::from_bits(counts[1])
            });
        }
    }
    Ok(Some(summaries))
}

/// Everything one rank does: receive the inputs, then sweep
fn rank_main<C, F>(
    comm: &mut C, source: Option<F>, config: &WavefrontConfig
) -> anyhow::Result<(RankReport, Option<SequencePair>)>
where
    C: Communicator + ?Sized,
    F: FnOnce() -> anyhow::Result<SequencePair>
{
    let (seq_a, seq_b) = distribute_sequences(comm, source)?;
    let report = run_rank(comm, &seq_a, &seq_b, config)?;
    let sequences = if comm.is_root() {
        Some(SequencePair::new(seq_a, seq_b)?)
    } else {
        None
    };
    Ok((report, sequences))
}

/// Startup protocol: the root loads both sequences and broadcasts the lengths, then the contents.
/// Every rank validates what it received before any block is computed.
/// # Errors
/// * if the root cannot load the inputs
/// * if the lengths are unusable or do not match the contents
pub fn distribute_sequences<C, F>(comm: &mut C, source: Option<F>) -> anyhow::Result<(Vec<u8>, Vec<u8>)>
where
    C: Communicator + ?Sized,
    F: FnOnce() -> anyhow::Result<SequencePair>
{
    let (seq_a, seq_b) = if comm.is_root() {
        let source = source.context("Root rank was not given a sequence source")?;
        source()?.into_parts()
    } else {
        (vec![], vec![])
    };

    let lengths = comm.broadcast_counts(ROOT_RANK, vec![seq_a.len() as u64, seq_b.len() as u64])?;
    ensure!(lengths.len() == 2, "Expected 2 sequence lengths, received {}", lengths.len());
    let len_a = usize::try_from(lengths[0])?;
    let len_b = usize::try_from(lengths[1])?;
    check_score_capacity(len_a, len_b)?;

    let seq_a = comm.broadcast_symbols(ROOT_RANK, seq_a)?;
    let seq_b = comm.broadcast_symbols(ROOT_RANK, seq_b)?;
    ensure!(
        seq_a.len() == len_a && seq_b.len() == len_b,
        "Received sequences of length {} and {}, expected {len_a} and {len_b}", seq_a.len(), seq_b.len()
    );
    debug!("R#{}: received sequences of length {len_a} and {len_b}", comm.rank());
    Ok((seq_a, seq_b))
}

/// True if an error only reports that another rank tore the group down
fn is_abort(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<CommError>(), Some(CommError::Aborted))
}
