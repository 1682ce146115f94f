/// Helper functions for read/writing JSON via serde
pub mod json_io;
/// Helper functions for generating the progress bars
pub mod progress_bar;
/// Sequential LCS scoring, used as the reference for the parallel engines
pub mod sequence_alignment;
/// Seeded random sequences for tests
#[cfg(test)]
pub mod random_sequence;
