use anyhow::Context;
use derive_builder::Builder;
use log::{Level, debug, log};
use std::time::Instant;

use crate::comm::{Communicator, ROOT_RANK, Tag};
use crate::data_types::block_grid::{BlockCoord, BlockGrid, DEFAULT_BLOCK_SIZE};
use crate::data_types::debug_level::DebugLevel;
use crate::data_types::score_grid::{ScoreGrid, ScoreType};
use crate::data_types::sequence_pair::check_score_capacity;
use crate::wavefront::exchange::{receive_horizontal, receive_vertical, send_horizontal, send_vertical};
use crate::wavefront::kernel::fill_block;
use crate::wavefront::reconstruction::reconstruct_at_root;
use crate::wavefront::store::ScoreStore;

/// Options shared by every rank of a wavefront run
#[derive(Builder, Clone, Copy, Debug)]
#[builder(default)]
pub struct WavefrontConfig {
    /// Block edge length; 0 makes the whole matrix a single block
    block_size: usize,
    /// Runtime debug behavior
    debug_level: DebugLevel,
    /// if true, the root gathers the full score matrix after the sweep
    reconstruct: bool
}

impl Default for WavefrontConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            debug_level: DebugLevel::default(),
            reconstruct: false
        }
    }
}

impl WavefrontConfig {
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    /// True if the matrix gets gathered, either because it was asked for or because it will be printed
    pub fn gathers_matrix(&self) -> bool {
        self.reconstruct || self.debug_level.dumps_matrix()
    }
}

/// What one rank reports after a sweep
#[derive(Clone, Debug)]
pub struct RankReport {
    /// The reporting rank
    pub rank: usize,
    /// Number of blocks this rank computed
    pub blocks_computed: usize,
    /// The LCS score; only the root is guaranteed to have it
    pub final_score: Option<ScoreType>,
    /// Full score matrix, root only and only when gathering was enabled
    pub matrix: Option<ScoreGrid>,
    /// Seconds from the first diagonal to the final score, reconstruction excluded
    pub compute_seconds: f64
}

/// Runs the block wavefront for one rank. Every rank of the group must call this with identical inputs.
/// The root's report carries the final score.
/// # Arguments
/// * `comm` - this rank's communication context
/// * `seq_a` - sequence A, the column axis
/// * `seq_b` - sequence B, the row axis
/// * `config` - run options, identical across ranks
/// # Errors
/// * if the inputs cannot be scored in a `ScoreType`
/// * if any exchange with another rank fails
pub fn run_rank<C: Communicator + ?Sized>(
    comm: &mut C, seq_a: &[u8], seq_b: &[u8], config: &WavefrontConfig
) -> anyhow::Result<RankReport> {
    check_score_capacity(seq_a.len(), seq_b.len())?;
    let rank = comm.rank();
    let grid = BlockGrid::new(seq_a.len(), seq_b.len(), config.block_size(), comm.size())?;
    let step_level = if config.debug_level().traces_steps() { Level::Info } else { Level::Trace };
    debug!(
        "R#{rank}: {}x{} blocks of edge {}, {} diagonals",
        grid.total_row_blocks(), grid.total_col_blocks(), grid.block_size(), grid.diagonal_count()
    );

    let start_time = Instant::now();
    let mut store = ScoreStore::default();
    for diagonal in 0..grid.diagonal_count() {
        log!(step_level, "R#{rank}: diagonal {diagonal}");
        for block in grid.blocks_on_diagonal(diagonal).filter(|&b| grid.owner(b) == rank) {
            log!(step_level, "R#{rank}: computing block {block}");
            process_block(comm, &grid, &mut store, block, seq_a, seq_b)
                .with_context(|| format!("Error while processing block {block} on rank {rank}"))?;
        }
    }

    let final_score = gather_final_score(comm, &grid, &store)?;
    let compute_seconds = start_time.elapsed().as_secs_f64();
    debug!("R#{rank}: computed {} blocks in {compute_seconds} seconds", store.len());

    let matrix = if config.gathers_matrix() {
        reconstruct_at_root(comm, &grid, &store)
            .with_context(|| format!("Error while reconstructing the score matrix on rank {rank}"))?
    } else {
        None
    };

    Ok(RankReport {
        rank,
        blocks_computed: store.len(),
        final_score,
        matrix,
        compute_seconds
    })
}

/// Receive halos, fill, and send halos for one owned block
fn process_block<C: Communicator + ?Sized>(
    comm: &mut C, grid: &BlockGrid, store: &mut ScoreStore, block: BlockCoord, seq_a: &[u8], seq_b: &[u8]
) -> anyhow::Result<()> {
    grid.validate(block)?;
    let extent = grid.extent(block);
    let tile = store.allocate(block, &extent)?;

    receive_horizontal(comm, grid, block, tile)?;
    receive_vertical(comm, grid, block, tile)?;

    // score index i covers symbol i-1
    let block_a = &seq_a[extent.col_start - 1..extent.col_end];
    let block_b = &seq_b[extent.row_start - 1..extent.row_end];
    fill_block(tile, block_a, block_b)?;

    send_horizontal(&*comm, grid, block, tile)?;
    send_vertical(&*comm, grid, block, tile)?;
    Ok(())
}

/// Moves the bottom-right score to the root, which is the only rank that reports it.
/// An empty grid scores 0 without any messages.
fn gather_final_score<C: Communicator + ?Sized>(
    comm: &mut C, grid: &BlockGrid, store: &ScoreStore
) -> anyhow::Result<Option<ScoreType>> {
    let Some(final_block) = grid.final_block() else {
        return Ok(comm.is_root().then_some(0));
    };

    let owner = grid.owner(final_block);
    if owner == comm.rank() {
        let score = store.corner_score(final_block)
            .with_context(|| format!("Final block {final_block} was never computed"))?;
        if comm.is_root() {
            Ok(Some(score))
        } else {
            comm.send_scores(ROOT_RANK, Tag::FinalScore, vec![score])?;
            Ok(None)
        }
    } else if comm.is_root() {
        let score = comm.recv_scores(owner, Tag::FinalScore, 1)?;
        Ok(Some(score[0]))
    } else {
        Ok(None)
    }
}
