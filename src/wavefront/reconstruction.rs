use anyhow::Context;
use itertools::iproduct;
use log::debug;

use crate::comm::{Communicator, ROOT_RANK, Tag};
use crate::data_types::block_grid::{BlockCoord, BlockGrid};
use crate::data_types::score_grid::ScoreGrid;
use crate::wavefront::store::ScoreStore;

/// Gathers every block into a full `(M+1) x (N+1)` score matrix on the root.
/// Blocks are visited in row-major order on every rank; each row of a remote block travels as its own
/// message tagged with the global row index, so per-channel ordering is enough to match them up.
/// # Arguments
/// * `comm` - this rank's communication context
/// * `grid` - the shared block grid
/// * `store` - this rank's computed tiles
/// # Returns
/// * the full matrix on the root, None everywhere else
/// # Errors
/// * if a local tile is missing or a transfer fails
pub fn reconstruct_at_root<C: Communicator + ?Sized>(
    comm: &mut C, grid: &BlockGrid, store: &ScoreStore
) -> anyhow::Result<Option<ScoreGrid>> {
    let blocks = iproduct!(0..grid.total_row_blocks(), 0..grid.total_col_blocks())
        .map(|(row, col)| BlockCoord::new(row, col));

    if comm.is_root() {
        let mut matrix = ScoreGrid::new(grid.seq_b_len() + 1, grid.seq_a_len() + 1);
        for block in blocks {
            let owner = grid.owner(block);
            let extent = grid.extent(block);
            for offset in 0..extent.height() {
                let row = extent.row_start + offset;
                let target = &mut matrix.row_mut(row)[extent.col_start..=extent.col_end];
                if owner == ROOT_RANK {
                    let tile = store.tile(block)
                        .with_context(|| format!("Root is missing its own block {block}"))?;
                    target.copy_from_slice(&tile.row(offset + 1)[1..]);
                } else {
                    let values = comm.recv_scores(owner, Tag::Reconstruction(row), extent.width())?;
                    target.copy_from_slice(&values);
                }
            }
        }
        debug!("R#{ROOT_RANK}: reconstructed a {}x{} score matrix", matrix.rows(), matrix.cols());
        Ok(Some(matrix))
    } else {
        let rank = comm.rank();
        for block in blocks.filter(|&b| grid.owner(b) == rank) {
            let tile = store.tile(block)
                .with_context(|| format!("Rank {rank} is missing its own block {block}"))?;
            let row_start = grid.extent(block).row_start;
            for offset in 0..tile.rows() - 1 {
                comm.send_scores(ROOT_RANK, Tag::Reconstruction(row_start + offset), tile.row(offset + 1)[1..].to_vec())?;
            }
        }
        Ok(None)
    }
}
