use anyhow::bail;
use rustc_hash::FxHashMap as HashMap;
use std::collections::hash_map::Entry;

use crate::data_types::block_grid::{BlockCoord, BlockExtent};
use crate::data_types::score_grid::{ScoreGrid, ScoreType};

/// Per-rank score storage.
/// Each owned block gets a `(height+1) x (width+1)` tile: row 0 holds the top halo (corner included),
/// column 0 holds the left halo, and everything else is the block's own interior.
#[derive(Debug, Default)]
pub struct ScoreStore {
    tiles: HashMap<BlockCoord, ScoreGrid>
}

impl ScoreStore {
    /// Allocates a zeroed tile for a block, so blocks on the matrix border already see the DP base case.
    /// # Errors
    /// * if the block already has a tile, each block is computed exactly once
    pub fn allocate(&mut self, block: BlockCoord, extent: &BlockExtent) -> anyhow::Result<&mut ScoreGrid> {
        match self.tiles.entry(block) {
            Entry::Occupied(_) => bail!("Block {block} was allocated twice"),
            Entry::Vacant(slot) => Ok(slot.insert(ScoreGrid::new(extent.height() + 1, extent.width() + 1)))
        }
    }

    pub fn tile(&self, block: BlockCoord) -> Option<&ScoreGrid> {
        self.tiles.get(&block)
    }

    /// Bottom-right score of a computed block
    pub fn corner_score(&self, block: BlockCoord) -> Option<ScoreType> {
        self.tile(block).and_then(|t| t.last())
    }

    /// Number of blocks stored
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
