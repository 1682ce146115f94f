use serde::Serialize;

/// Default block edge; ~192x192x2 bytes keeps a block comfortably inside L2
pub const DEFAULT_BLOCK_SIZE: usize = 192;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PartitionError {
    #[error("world size must be at least 1")]
    EmptyWorld,
    #[error("block ({row}, {col}) is outside the {rows}x{cols} block grid")]
    OutOfGrid { row: usize, col: usize, rows: usize, cols: usize },
}

/// Coordinates of a block in the block grid
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct BlockCoord {
    /// Block row, indexes sequence B
    pub row: usize,
    /// Block column, indexes sequence A
    pub col: usize
}

impl BlockCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The wavefront this block belongs to
    pub fn diagonal(&self) -> usize {
        self.row + self.col
    }
}

impl std::fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Inclusive score-matrix ranges covered by one block.
/// Row 0 and column 0 of the score matrix are never inside a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockExtent {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize
}

impl BlockExtent {
    /// Number of score rows in the block
    pub fn height(&self) -> usize {
        self.row_end + 1 - self.row_start
    }

    /// Number of score columns in the block
    pub fn width(&self) -> usize {
        self.col_end + 1 - self.col_start
    }
}

/// Static partitioning of the score matrix into square blocks along with their cyclic owners.
/// Every rank derives the identical grid from the same inputs, so no negotiation is ever needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlockGrid {
    /// Length of sequence A (columns)
    seq_a_len: usize,
    /// Length of sequence B (rows)
    seq_b_len: usize,
    /// Effective block edge
    block_size: usize,
    /// ceil(M / S)
    total_row_blocks: usize,
    /// ceil(N / S)
    total_col_blocks: usize,
    /// Number of ranks blocks are distributed across
    world_size: usize
}

impl BlockGrid {
    /// Builds the block grid for a problem.
    /// A `block_size` of 0 is treated as one block spanning the whole matrix.
    /// # Arguments
    /// * `seq_a_len` - length of sequence A, the column axis
    /// * `seq_b_len` - length of sequence B, the row axis
    /// * `block_size` - requested block edge
    /// * `world_size` - number of ranks
    /// # Errors
    /// * if `world_size` is 0
    pub fn new(seq_a_len: usize, seq_b_len: usize, block_size: usize, world_size: usize) -> Result<Self, PartitionError> {
        if world_size == 0 {
            return Err(PartitionError::EmptyWorld);
        }

        let block_size = if block_size == 0 {
            seq_a_len.max(seq_b_len).max(1)
        } else {
            block_size
        };

        Ok(Self {
            seq_a_len,
            seq_b_len,
            block_size,
            total_row_blocks: seq_b_len.div_ceil(block_size),
            total_col_blocks: seq_a_len.div_ceil(block_size),
            world_size
        })
    }

    pub fn seq_a_len(&self) -> usize {
        self.seq_a_len
    }

    pub fn seq_b_len(&self) -> usize {
        self.seq_b_len
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn total_row_blocks(&self) -> usize {
        self.total_row_blocks
    }

    pub fn total_col_blocks(&self) -> usize {
        self.total_col_blocks
    }

    pub fn world_size(&self) -> usize {
        self.world_size
    }

    pub fn total_blocks(&self) -> usize {
        self.total_row_blocks * self.total_col_blocks
    }

    /// True when either sequence is empty, there is nothing to compute
    pub fn is_empty(&self) -> bool {
        self.total_blocks() == 0
    }

    /// Checks that a block is inside the grid
    pub fn validate(&self, block: BlockCoord) -> Result<(), PartitionError> {
        if block.row < self.total_row_blocks && block.col < self.total_col_blocks {
            Ok(())
        } else {
            Err(PartitionError::OutOfGrid {
                row: block.row, col: block.col,
                rows: self.total_row_blocks, cols: self.total_col_blocks
            })
        }
    }

    /// Cyclic owner of a block: `(r * totalColBlocks + c) mod worldSize`
    pub fn owner(&self, block: BlockCoord) -> usize {
        (block.row * self.total_col_blocks + block.col) % self.world_size
    }

    /// Score-matrix rows and columns covered by a block; edge blocks are clipped to the sequence lengths.
    pub fn extent(&self, block: BlockCoord) -> BlockExtent {
        BlockExtent {
            row_start: block.row * self.block_size + 1,
            row_end: ((block.row + 1) * self.block_size).min(self.seq_b_len),
            col_start: block.col * self.block_size + 1,
            col_end: ((block.col + 1) * self.block_size).min(self.seq_a_len)
        }
    }

    /// Number of block diagonals, `totalRowBlocks + totalColBlocks - 1`
    pub fn diagonal_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.total_row_blocks + self.total_col_blocks - 1
        }
    }

    /// All blocks on a diagonal, in increasing row order.
    /// Out of range diagonals are simply empty.
    pub fn blocks_on_diagonal(&self, diagonal: usize) -> impl Iterator<Item = BlockCoord> {
        let (first_row, last_row) = if diagonal < self.diagonal_count() {
            (
                diagonal.saturating_sub(self.total_col_blocks - 1),
                diagonal.min(self.total_row_blocks - 1)
            )
        } else {
            // empty range
            (1, 0)
        };
        (first_row..=last_row).map(move |row| BlockCoord::new(row, diagonal - row))
    }

    /// All blocks a rank owns, in the order the scheduler visits them
    pub fn owned_blocks(&self, rank: usize) -> Vec<BlockCoord> {
        (0..self.diagonal_count())
            .flat_map(|d| self.blocks_on_diagonal(d))
            .filter(|&b| self.owner(b) == rank)
            .collect()
    }

    /// The block holding the bottom-right cell of the score matrix
    pub fn final_block(&self) -> Option<BlockCoord> {
        if self.is_empty() {
            None
        } else {
            Some(BlockCoord::new(self.total_row_blocks - 1, self.total_col_blocks - 1))
        }
    }

    /// Block directly above, whose bottom row is our top halo
    pub fn above(&self, block: BlockCoord) -> Option<BlockCoord> {
        (block.row > 0).then(|| BlockCoord::new(block.row - 1, block.col))
    }

    /// Block directly below, which consumes our bottom row
    pub fn below(&self, block: BlockCoord) -> Option<BlockCoord> {
        (block.row + 1 < self.total_row_blocks).then(|| BlockCoord::new(block.row + 1, block.col))
    }

    /// Block directly to the left, whose right column is our left halo
    pub fn left(&self, block: BlockCoord) -> Option<BlockCoord> {
        (block.col > 0).then(|| BlockCoord::new(block.row, block.col - 1))
    }

    /// Block directly to the right, which consumes our right column
    pub fn right(&self, block: BlockCoord) -> Option<BlockCoord> {
        (block.col + 1 < self.total_col_blocks).then(|| BlockCoord::new(block.row, block.col + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_grid_shape() {
        // 10 columns, 7 rows, S=3 -> 3 row blocks, 4 col blocks
        let grid = BlockGrid::new(10, 7, 3, 4).unwrap();
        assert_eq!(grid.total_row_blocks(), 3);
        assert_eq!(grid.total_col_blocks(), 4);
        assert_eq!(grid.total_blocks(), 12);
        assert_eq!(grid.diagonal_count(), 6);
        assert_eq!(grid.final_block(), Some(BlockCoord::new(2, 3)));
    }

    #[test]
    fn test_extent_edges() {
        let grid = BlockGrid::new(10, 7, 3, 1).unwrap();
        let first = grid.extent(BlockCoord::new(0, 0));
        assert_eq!(first, BlockExtent { row_start: 1, row_end: 3, col_start: 1, col_end: 3 });
        assert_eq!((first.height(), first.width()), (3, 3));

        // bottom-right block is clipped on both axes
        let last = grid.extent(BlockCoord::new(2, 3));
        assert_eq!(last, BlockExtent { row_start: 7, row_end: 7, col_start: 10, col_end: 10 });
        assert_eq!((last.height(), last.width()), (1, 1));
    }

    #[test]
    fn test_owner_is_cyclic() {
        let grid = BlockGrid::new(10, 7, 3, 5).unwrap();
        let owners: Vec<usize> = (0..3)
            .flat_map(|r| (0..4).map(move |c| BlockCoord::new(r, c)))
            .map(|b| grid.owner(b))
            .collect();
        assert_eq!(owners, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 0, 1]);
    }

    #[test]
    fn test_ownership_covers_every_block_once() {
        for world_size in [1, 2, 3, 5, 40] {
            let grid = BlockGrid::new(17, 11, 4, world_size).unwrap();
            let mut seen = BTreeSet::new();
            for rank in 0..world_size {
                for block in grid.owned_blocks(rank) {
                    assert_eq!(grid.owner(block), rank);
                    assert!(seen.insert(block), "block {block} owned twice");
                }
            }
            assert_eq!(seen.len(), grid.total_blocks());

            // stable across calls
            let again = BlockGrid::new(17, 11, 4, world_size).unwrap();
            for rank in 0..world_size {
                assert_eq!(grid.owned_blocks(rank), again.owned_blocks(rank));
            }
        }
    }

    #[test]
    fn test_diagonals() {
        let grid = BlockGrid::new(10, 7, 3, 2).unwrap();
        let d0: Vec<BlockCoord> = grid.blocks_on_diagonal(0).collect();
        assert_eq!(d0, vec![BlockCoord::new(0, 0)]);

        let d3: Vec<BlockCoord> = grid.blocks_on_diagonal(3).collect();
        assert_eq!(d3, vec![BlockCoord::new(0, 3), BlockCoord::new(1, 2), BlockCoord::new(2, 1)]);

        let d5: Vec<BlockCoord> = grid.blocks_on_diagonal(5).collect();
        assert_eq!(d5, vec![BlockCoord::new(2, 3)]);

        assert_eq!(grid.blocks_on_diagonal(6).count(), 0);

        // every block sits on exactly one diagonal, the one matching its index sum
        let total: usize = (0..grid.diagonal_count())
            .map(|d| {
                grid.blocks_on_diagonal(d).inspect(|b| assert_eq!(b.diagonal(), d)).count()
            })
            .sum();
        assert_eq!(total, grid.total_blocks());
    }

    #[test]
    fn test_neighbors() {
        let grid = BlockGrid::new(10, 7, 3, 2).unwrap();
        let corner = BlockCoord::new(0, 0);
        assert_eq!(grid.above(corner), None);
        assert_eq!(grid.left(corner), None);
        assert_eq!(grid.below(corner), Some(BlockCoord::new(1, 0)));
        assert_eq!(grid.right(corner), Some(BlockCoord::new(0, 1)));

        let last = BlockCoord::new(2, 3);
        assert_eq!(grid.below(last), None);
        assert_eq!(grid.right(last), None);
        assert_eq!(grid.above(last), Some(BlockCoord::new(1, 3)));
        assert_eq!(grid.left(last), Some(BlockCoord::new(2, 2)));
    }

    #[test]
    fn test_degenerate_inputs() {
        // zero block size is one big block
        let grid = BlockGrid::new(10, 7, 0, 3).unwrap();
        assert_eq!(grid.block_size(), 10);
        assert_eq!(grid.total_blocks(), 1);

        // empty sequence gives an empty grid
        let grid = BlockGrid::new(0, 7, 3, 3).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.diagonal_count(), 0);
        assert_eq!(grid.final_block(), None);
        assert!(grid.owned_blocks(0).is_empty());
        assert_eq!(grid.blocks_on_diagonal(0).count(), 0);

        let grid = BlockGrid::new(0, 0, 0, 1).unwrap();
        assert!(grid.is_empty());

        assert_eq!(BlockGrid::new(3, 3, 3, 0), Err(PartitionError::EmptyWorld));
    }

    #[test]
    fn test_validate() {
        let grid = BlockGrid::new(10, 7, 3, 2).unwrap();
        assert!(grid.validate(BlockCoord::new(2, 3)).is_ok());
        assert_eq!(
            grid.validate(BlockCoord::new(3, 0)),
            Err(PartitionError::OutOfGrid { row: 3, col: 0, rows: 3, cols: 4 })
        );
    }
}
