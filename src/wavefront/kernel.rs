use anyhow::ensure;

use crate::data_types::score_grid::ScoreGrid;

/// Fills the interior of a block tile with the LCS recurrence, in row-major order.
/// Row 0 and column 0 of the tile must already hold the block's halo (or the zero border).
/// # Arguments
/// * `tile` - the block tile, `(block_b.len()+1) x (block_a.len()+1)`
/// * `block_a` - the slice of sequence A covered by the block's columns
/// * `block_b` - the slice of sequence B covered by the block's rows
/// # Errors
/// * if the tile shape does not match the sequence slices
pub fn fill_block(tile: &mut ScoreGrid, block_a: &[u8], block_b: &[u8]) -> anyhow::Result<()> {
    ensure!(
        tile.rows() == block_b.len() + 1 && tile.cols() == block_a.len() + 1,
        "tile of {}x{} cannot hold a {}x{} block", tile.rows(), tile.cols(), block_b.len(), block_a.len()
    );

    for (i, &symbol_b) in block_b.iter().enumerate() {
        let (prev, cur) = tile.adjacent_rows_mut(i + 1);
        for (j, &symbol_a) in block_a.iter().enumerate() {
            cur[j + 1] = if symbol_a == symbol_b {
                // diagonal extension
                prev[j] + 1
            } else {
                // best of skipping a symbol in either sequence
                prev[j + 1].max(cur[j])
            };
        }
    }
    Ok(())
}
