use log::trace;

use crate::comm::{CommError, Communicator, Tag};
use crate::data_types::block_grid::{BlockCoord, BlockGrid};
use crate::data_types::score_grid::ScoreGrid;

/// Receives the top halo of `block` from the owner of the block above.
/// The halo is the above block's bottom row including the shared corner, `width + 1` elements,
/// and it lands in row 0 of the tile. Blocks in the first block row keep their zero border.
/// # Arguments
/// * `comm` - communication context of this rank
/// * `grid` - the shared block grid
/// * `block` - the block about to be computed
/// * `tile` - the block's tile in the score store
/// # Returns
/// * true if a halo was received
/// # Errors
/// * if the receive fails or the halo has the wrong length
pub fn receive_horizontal<C: Communicator + ?Sized>(
    comm: &mut C, grid: &BlockGrid, block: BlockCoord, tile: &mut ScoreGrid
) -> Result<bool, CommError> {
    let Some(above) = grid.above(block) else {
        return Ok(false);
    };
    let source = grid.owner(above);
    let expected = grid.extent(block).width() + 1;
    let row = comm.recv_scores(source, Tag::Horizontal, expected)?;
    trace!("R#{} block {block}: top halo of {expected} from R#{source}", comm.rank());
    tile.row_mut(0).copy_from_slice(&row);
    Ok(true)
}

/// Receives the left halo of `block` from the owner of the block to the left.
/// The halo is that block's right column without the corner, `height` elements, and it lands in column 0
/// of the tile starting at row 1. Blocks in the first block column keep their zero border.
/// # Arguments
/// * `comm` - communication context of this rank
/// * `grid` - the shared block grid
/// * `block` - the block about to be computed
/// * `tile` - the block's tile in the score store
/// # Returns
/// * true if a halo was received
/// # Errors
/// * if the receive fails or the halo has the wrong length
pub fn receive_vertical<C: Communicator + ?Sized>(
    comm: &mut C, grid: &BlockGrid, block: BlockCoord, tile: &mut ScoreGrid
) -> Result<bool, CommError> {
    let Some(left) = grid.left(block) else {
        return Ok(false);
    };
    let source = grid.owner(left);
    let expected = grid.extent(block).height();
    let column = comm.recv_scores(source, Tag::Vertical, expected)?;
    trace!("R#{} block {block}: left halo of {expected} from R#{source}", comm.rank());
    tile.set_column(0, 1, &column);
    Ok(true)
}

/// Sends the bottom row of a computed block, corner included, to the owner of the block below.
/// The last block row has nobody to send to.
/// # Returns
/// * true if a halo was sent
/// # Errors
/// * if the send fails
pub fn send_horizontal<C: Communicator + ?Sized>(
    comm: &C, grid: &BlockGrid, block: BlockCoord, tile: &ScoreGrid
) -> Result<bool, CommError> {
    let Some(below) = grid.below(block) else {
        return Ok(false);
    };
    let dest = grid.owner(below);
    let row = tile.row(tile.rows() - 1).to_vec();
    trace!("R#{} block {block}: bottom row of {} to R#{dest}", comm.rank(), row.len());
    comm.send_scores(dest, Tag::Horizontal, row)?;
    Ok(true)
}

/// Sends the right column of a computed block, corner excluded, to the owner of the block to the right.
/// The last block column has nobody to send to.
/// # Returns
/// * true if a halo was sent
/// # Errors
/// * if the send fails
pub fn send_vertical<C: Communicator + ?Sized>(
    comm: &C, grid: &BlockGrid, block: BlockCoord, tile: &ScoreGrid
) -> Result<bool, CommError> {
    let Some(right) = grid.right(block) else {
        return Ok(false);
    };
    let dest = grid.owner(right);
    let column = tile.column(tile.cols() - 1, 1..tile.rows());
    trace!("R#{} block {block}: right column of {} to R#{dest}", comm.rank(), column.len());
    comm.send_scores(dest, Tag::Vertical, column)?;
    Ok(true)
}
