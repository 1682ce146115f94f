/// Block partitioning of the score matrix and cyclic ownership
pub mod block_grid;
/// Runtime debug toggles
pub mod debug_level;
/// Statistics for the profiling harness
pub mod profile_stats;
/// Owned 2D score grids
pub mod score_grid;
/// The pair of input sequences
pub mod sequence_pair;
