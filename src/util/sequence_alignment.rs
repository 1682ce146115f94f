use crate::data_types::score_grid::ScoreGrid;

/// Returns the LCS length of two sequences by doing the full grid calculation with two rolling rows.
/// This version is row-based (rows are length of v1) for the main loop.
/// # Arguments
/// * `v1` - the first sequence, on the x-axis
/// * `v2` - the second sequence
pub fn lcs_length(v1: &[u8], v2: &[u8]) -> usize {
    let l1: usize = v1.len();
    let mut row: Vec<usize> = vec![0; l1+1];
    let mut prev_row: Vec<usize> = vec![0; l1+1];

    // go through each row
    for &c2 in v2.iter() {
        for (j, &c1) in v1.iter().enumerate() {
            row[j+1] = if c1 == c2 {
                prev_row[j]+1
            } else {
                prev_row[j+1].max(row[j])
            };
        }

        // swap the rows at the end of each iteration
        std::mem::swap(&mut row, &mut prev_row);
    }

    prev_row[l1]
}

/// Returns the full LCS score matrix, `(v2.len()+1) x (v1.len()+1)`.
/// Meant as a reference for small inputs, memory grows with the product of the lengths.
/// # Arguments
/// * `v1` - the column sequence
/// * `v2` - the row sequence
pub fn lcs_matrix(v1: &[u8], v2: &[u8]) -> ScoreGrid {
    let mut grid = ScoreGrid::new(v2.len()+1, v1.len()+1);
    for (i, &c2) in v2.iter().enumerate() {
        let (prev_row, row) = grid.adjacent_rows_mut(i+1);
        for (j, &c1) in v1.iter().enumerate() {
            row[j+1] = if c1 == c2 {
                prev_row[j]+1
            } else {
                prev_row[j+1].max(row[j])
            };
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcs_length() {
        let v1: Vec<u8> = vec![0, 1, 2, 4, 5];
        let v2: Vec<u8> = vec![0, 1, 3, 4, 5];
        let v3: Vec<u8> = vec![1, 2, 3, 5];
        let v4: Vec<u8> = vec![];

        assert_eq!(lcs_length(&v1, &v1), 5);
        assert_eq!(lcs_length(&v1, &v2), 4);
        assert_eq!(lcs_length(&v1, &v3), 3);
        assert_eq!(lcs_length(&v1, &v4), 0);

        assert_eq!(lcs_length(&v2, &v3), 3);
        assert_eq!(lcs_length(&v3, &v2), 3);
        assert_eq!(lcs_length(&v4, &v4), 0);
    }

    #[test]
    fn test_textbook_pairs() {
        assert_eq!(lcs_length(b"ABCBDAB", b"BDCABA"), 4);
        assert_eq!(lcs_length(b"BDCABA", b"ABCBDAB"), 4);
        assert_eq!(lcs_length(b"AGCAT", b"GAC"), 2);
        assert_eq!(lcs_length(b"AAAA", b"CCC"), 0);
    }

    #[test]
    fn test_lcs_matrix() {
        let grid = lcs_matrix(b"AGCAT", b"GAC");
        assert_eq!((grid.rows(), grid.cols()), (4, 6));
        assert_eq!(grid.row(0), &[0, 0, 0, 0, 0, 0]);
        assert_eq!(grid.row(1), &[0, 0, 1, 1, 1, 1]);
        assert_eq!(grid.row(2), &[0, 1, 1, 1, 2, 2]);
        assert_eq!(grid.row(3), &[0, 1, 1, 2, 2, 2]);
        assert_eq!(grid.last(), Some(2));

        let empty = lcs_matrix(b"", b"ACGT");
        assert_eq!((empty.rows(), empty.cols()), (5, 1));
        assert_eq!(empty.last(), Some(0));
    }
}
