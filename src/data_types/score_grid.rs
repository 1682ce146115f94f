use std::ops::{Index, IndexMut, Range};

/// The score type stored in every cell; LCS lengths are bounded by the shorter sequence.
pub type ScoreType = u16;

/// Owned 2D grid of scores, stored row-major in a single contiguous buffer.
/// Rows index sequence B and columns index sequence A everywhere in this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreGrid {
    /// Number of rows
    rows: usize,
    /// Number of columns, also the stride between rows
    cols: usize,
    /// Backing buffer of `rows * cols` scores
    data: Vec<ScoreType>
}

impl ScoreGrid {
    /// Creates a zero-filled grid, which also satisfies the DP base case on row 0 and column 0.
    /// # Arguments
    /// * `rows` - number of rows in the grid
    /// * `cols` - number of columns in the grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols]
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts a (row, col) pair into a buffer offset, panicking when out of bounds.
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) is out of bounds for a {}x{} score grid", self.rows, self.cols
        );
        row * self.cols + col
    }

    /// The bottom-right cell, which holds the LCS score once the grid is filled.
    pub fn last(&self) -> Option<ScoreType> {
        self.data.last().copied()
    }

    /// Full row as a slice
    pub fn row(&self, row: usize) -> &[ScoreType] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    /// Full row as a mutable slice
    pub fn row_mut(&mut self, row: usize) -> &mut [ScoreType] {
        let start = self.offset(row, 0);
        let cols = self.cols;
        &mut self.data[start..start + cols]
    }

    /// Returns the row before `row` along with a mutable handle on `row` itself.
    /// This is the access pattern of a row-major DP fill.
    /// # Panics
    /// * if `row` is 0 or outside the grid
    pub fn adjacent_rows_mut(&mut self, row: usize) -> (&[ScoreType], &mut [ScoreType]) {
        assert!(row > 0, "row 0 has no previous row");
        let start = self.offset(row, 0);
        let (head, tail) = self.data.split_at_mut(start);
        (&head[start - self.cols..], &mut tail[..self.cols])
    }

    /// Copies part of a column out of the grid.
    /// # Arguments
    /// * `col` - the column to copy
    /// * `rows` - the row range to copy
    pub fn column(&self, col: usize, rows: Range<usize>) -> Vec<ScoreType> {
        rows.map(|row| self[(row, col)]).collect()
    }

    /// Writes `values` down a column, starting at `start_row`.
    pub fn set_column(&mut self, col: usize, start_row: usize, values: &[ScoreType]) {
        for (offset, &value) in values.iter().enumerate() {
            self[(start_row + offset, col)] = value;
        }
    }

    /// Resets row 0 and column 0 to the DP base case.
    pub fn zero_borders(&mut self) {
        if self.rows == 0 {
            return;
        }
        self.row_mut(0).fill(0);
        for row in 1..self.rows {
            self[(row, 0)] = 0;
        }
    }

    /// Renders the full matrix as a labelled table, with sequence A across the top and B down the side.
    /// Intended for debugging on small inputs.
    /// # Arguments
    /// * `seq_a` - the column sequence
    /// * `seq_b` - the row sequence
    pub fn render(&self, seq_a: &[u8], seq_b: &[u8]) -> String {
        let separator = "=".repeat(40);
        let label = |seq: &[u8], index: usize| seq.get(index).map(|&c| char::from(c)).unwrap_or('?');

        let mut lines = vec!["Score Matrix:".to_string(), separator.clone()];
        let header: String = (1..self.cols)
            .map(|col| format!("{:>5}   ", label(seq_a, col - 1)))
            .collect();
        lines.push(format!("    {:>5}   {header}", ' '));
        for row in 0..self.rows {
            let prefix = if row == 0 { "    ".to_string() } else { format!("{}   ", label(seq_b, row - 1)) };
            let values: String = self.row(row).iter()
                .map(|value| format!("{value:>5}   "))
                .collect();
            lines.push(format!("{prefix}{values}"));
        }
        lines.push(separator);
        lines.join("\n")
    }
}

impl Index<(usize, usize)> for ScoreGrid {
    type Output = ScoreType;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        let offset = self.offset(row, col);
        &self.data[offset]
    }
}

impl IndexMut<(usize, usize)> for ScoreGrid {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let grid = ScoreGrid::new(3, 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert!((0..3).all(|r| grid.row(r).iter().all(|&v| v == 0)));
        assert_eq!(grid.last(), Some(0));
        assert_eq!(ScoreGrid::new(0, 0).last(), None);
    }

    #[test]
    fn test_index() {
        let mut grid = ScoreGrid::new(2, 3);
        grid[(1, 2)] = 7;
        grid[(0, 1)] = 3;
        assert_eq!(grid[(1, 2)], 7);
        assert_eq!(grid[(0, 1)], 3);
        assert_eq!(grid.row(1), &[0, 0, 7]);
        assert_eq!(grid.last(), Some(7));
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let grid = ScoreGrid::new(2, 2);
        let _ = grid[(0, 2)];
    }

    #[test]
    fn test_columns() {
        let mut grid = ScoreGrid::new(4, 2);
        grid.set_column(1, 1, &[5, 6, 7]);
        assert_eq!(grid.column(1, 0..4), vec![0, 5, 6, 7]);
        assert_eq!(grid.column(1, 2..4), vec![6, 7]);
        assert_eq!(grid.column(0, 0..4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_adjacent_rows() {
        let mut grid = ScoreGrid::new(3, 2);
        grid.row_mut(1).copy_from_slice(&[1, 2]);
        let (prev, cur) = grid.adjacent_rows_mut(2);
        assert_eq!(prev, &[1, 2]);
        cur[1] = prev[1] + 1;
        assert_eq!(grid.row(2), &[0, 3]);
    }

    #[test]
    fn test_zero_borders() {
        let mut grid = ScoreGrid::new(3, 3);
        for r in 0..3 {
            grid.row_mut(r).fill(9);
        }
        grid.zero_borders();
        assert_eq!(grid.row(0), &[0, 0, 0]);
        assert_eq!(grid.row(1), &[0, 9, 9]);
        assert_eq!(grid.column(0, 0..3), vec![0, 0, 0]);
    }

    #[test]
    fn test_render() {
        let mut grid = ScoreGrid::new(2, 3);
        grid[(1, 2)] = 1;
        let text = grid.render(b"AC", b"C");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Score Matrix:");
        assert!(lines[2].contains('A') && lines[2].contains('C'));
        assert!(lines[4].starts_with("C   "));
        assert!(lines[4].trim_end().ends_with('1'));
        assert_eq!(lines.len(), 6);
    }
}
