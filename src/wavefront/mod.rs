/*!
# Wavefront module
Block-wavefront LCS scoring across a group of ranks that only talk through messages.
The score matrix is cut into square blocks that are dealt out cyclically.
Each rank sweeps the block anti-diagonals in order and computes the blocks it owns, after receiving the halos its
neighbors send it.

## Example usage
```rust
use lcs_wavefront::data_types::sequence_pair::SequencePair;
use lcs_wavefront::wavefront::launcher::launch;
use lcs_wavefront::wavefront::scheduler::WavefrontConfigBuilder;

let config = WavefrontConfigBuilder::default()
    .block_size(2)
    .build().unwrap();
let pair = SequencePair::new(b"ABCBDAB".to_vec(), b"BDCABA".to_vec()).unwrap();
let report = launch(3, config, move || Ok(pair)).unwrap();
assert_eq!(report.score, 4);
```
*/

/// Sending and receiving block halos
pub mod exchange;
/// The per-block DP fill
pub mod kernel;
/// Runs a whole group of ranks inside this process
pub mod launcher;
/// Debug gathering of the full score matrix on the root
pub mod reconstruction;
/// The per-rank diagonal sweep
pub mod scheduler;
/// Single process anti-diagonal variant on rayon
pub mod shared;
/// Per-rank tile storage
pub mod store;
