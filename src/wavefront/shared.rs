use rayon::prelude::*;

use crate::data_types::score_grid::ScoreType;

/// Cells per rayon task; short diagonals are not worth splitting further
const MIN_CELLS_PER_TASK: usize = 512;

/// Shared-memory LCS that sweeps anti-diagonals of the full score matrix, computing each one in parallel.
/// Only three diagonals are alive at a time, each indexed by score row `i` (sequence B).
/// Runs on the current rayon pool.
/// # Arguments
/// * `seq_a` - sequence A, the column axis
/// * `seq_b` - sequence B, the row axis
pub fn anti_diagonal_lcs(seq_a: &[u8], seq_b: &[u8]) -> ScoreType {
    let n = seq_a.len();
    let m = seq_b.len();
    if n == 0 || m == 0 {
        return 0;
    }

    // diagonals k-2, k-1, and k; zeroes cover diagonals 0 and 1 entirely
    let mut prev2: Vec<ScoreType> = vec![0; m + 1];
    let mut prev: Vec<ScoreType> = vec![0; m + 1];
    let mut cur: Vec<ScoreType> = vec![0; m + 1];

    for k in 2..=(m + n) {
        let lo = k.saturating_sub(n).max(1);
        let hi = m.min(k - 1);

        cur[lo..=hi].par_iter_mut()
            .with_min_len(MIN_CELLS_PER_TASK)
            .enumerate()
            .for_each(|(offset, cell)| {
                let i = lo + offset;
                let j = k - i;
                *cell = if seq_a[j - 1] == seq_b[i - 1] {
                    prev2[i - 1] + 1
                } else {
                    prev[i - 1].max(prev[i])
                };
            });

        // borders: (0, k) sits at index 0 and (k, 0) at index k
        cur[0] = 0;
        if k <= m {
            cur[k] = 0;
        }

        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[m]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::random_sequence::random_dna;
    use crate::util::sequence_alignment::lcs_length;

    #[test]
    fn test_known_answers() {
        assert_eq!(anti_diagonal_lcs(b"ABCBDAB", b"BDCABA"), 4);
        assert_eq!(anti_diagonal_lcs(b"AGCAT", b"GAC"), 2);
        assert_eq!(anti_diagonal_lcs(b"ACGT", b"ACGT"), 4);
        assert_eq!(anti_diagonal_lcs(b"AAA", b"TTTT"), 0);
        assert_eq!(anti_diagonal_lcs(b"A", b"A"), 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(anti_diagonal_lcs(b"", b"ACGT"), 0);
        assert_eq!(anti_diagonal_lcs(b"ACGT", b""), 0);
        assert_eq!(anti_diagonal_lcs(b"", b""), 0);
    }

    #[test]
    fn test_matches_oracle_on_odd_shapes() {
        let pairs: [(&[u8], &[u8]); 5] = [
            (b"X", b"GATTACAXGATTACA"),
            (b"GATTACAXGATTACA", b"X"),
            (b"ACCGGTTACGTAGCTAGCTAGGATCCA", b"TTAGGCATCGA"),
            (b"TTAGGCATCGA", b"ACCGGTTACGTAGCTAGCTAGGATCCA"),
            (b"ABABABABABABABAB", b"BABABABA")
        ];
        for (a, b) in pairs {
            assert_eq!(usize::from(anti_diagonal_lcs(a, b)), lcs_length(a, b));
        }
    }

    #[test]
    fn test_long_diagonals() {
        // long enough that diagonals get split across tasks
        let a = random_dna(3000, 21);
        let b = random_dna(2500, 22);
        assert_eq!(usize::from(anti_diagonal_lcs(&a, &b)), lcs_length(&a, &b));
    }
}
