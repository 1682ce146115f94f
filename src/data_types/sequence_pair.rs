use anyhow::ensure;

use crate::data_types::score_grid::ScoreType;

/// The two input sequences; A runs along the columns and B down the rows of the score matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequencePair {
    /// Sequence A, the column axis
    seq_a: Vec<u8>,
    /// Sequence B, the row axis
    seq_b: Vec<u8>
}

impl SequencePair {
    /// Constructor with checks
    /// # Arguments
    /// * `seq_a` - the column sequence
    /// * `seq_b` - the row sequence
    /// # Errors
    /// * if both sequences are longer than a score cell can count
    pub fn new(seq_a: Vec<u8>, seq_b: Vec<u8>) -> anyhow::Result<Self> {
        check_score_capacity(seq_a.len(), seq_b.len())?;
        Ok(Self { seq_a, seq_b })
    }

    pub fn seq_a(&self) -> &[u8] {
        &self.seq_a
    }

    pub fn seq_b(&self) -> &[u8] {
        &self.seq_b
    }

    /// Splits the pair back into (A, B)
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.seq_a, self.seq_b)
    }
}

/// The LCS can be at most the shorter length, which has to fit in a score cell.
/// # Errors
/// * if `min(len_a, len_b)` exceeds `ScoreType::MAX`
pub fn check_score_capacity(len_a: usize, len_b: usize) -> anyhow::Result<()> {
    let max_score = len_a.min(len_b);
    ensure!(
        max_score <= ScoreType::MAX as usize,
        "sequences of length {len_a} and {len_b} may produce a score above {}", ScoreType::MAX
    );
    Ok(())
}
