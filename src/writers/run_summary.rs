use serde::Serialize;
use std::path::Path;

use crate::data_types::score_grid::ScoreType;
use crate::util::json_io::save_json;
use crate::wavefront::launcher::{RankSummary, WavefrontReport};

/// Facts about one distributed run, independent of how the CLI was invoked
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    /// Crate version that produced the run
    pub version: String,
    /// Length of sequence A
    pub seq_a_len: usize,
    /// Length of sequence B
    pub seq_b_len: usize,
    /// Effective block edge
    pub block_size: usize,
    /// Block rows, ceil(M / S)
    pub total_row_blocks: usize,
    /// Block columns, ceil(N / S)
    pub total_col_blocks: usize,
    /// Number of ranks
    pub world_size: usize,
    /// The LCS length
    pub score: ScoreType,
    /// Wall-clock seconds for the whole run
    pub elapsed_seconds: f64,
    /// Per-rank breakdown
    pub ranks: Vec<RankSummary>
}

impl RunSummary {
    /// Pulls the summary out of a finished run
    pub fn from_report(report: &WavefrontReport, version: &str) -> Self {
        let grid = &report.grid;
        Self {
            version: version.to_string(),
            seq_a_len: grid.seq_a_len(),
            seq_b_len: grid.seq_b_len(),
            block_size: grid.block_size(),
            total_row_blocks: grid.total_row_blocks(),
            total_col_blocks: grid.total_col_blocks(),
            world_size: grid.world_size(),
            score: report.score,
            elapsed_seconds: report.elapsed_seconds,
            ranks: report.ranks.clone()
        }
    }

    /// Saves the summary as JSON, gzip compressed if the name ends in `.gz`
    /// # Errors
    /// * if the file cannot be written
    pub fn write(&self, filename: &Path) -> anyhow::Result<()> {
        save_json(self, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::sequence_pair::SequencePair;
    use crate::wavefront::launcher::launch;
    use crate::wavefront::scheduler::WavefrontConfigBuilder;

    #[test]
    fn test_summary_from_run() {
        let config = WavefrontConfigBuilder::default().block_size(3).build().unwrap();
        let pair = SequencePair::new(b"ABCBDAB".to_vec(), b"BDCABA".to_vec()).unwrap();
        let report = launch(2, config, move || Ok(pair)).unwrap();

        let summary = RunSummary::from_report(&report, "0.0.0-test");
        assert_eq!(summary.score, 4);
        assert_eq!((summary.seq_a_len, summary.seq_b_len), (7, 6));
        assert_eq!((summary.total_row_blocks, summary.total_col_blocks), (2, 3));
        assert_eq!(summary.world_size, 2);
        assert_eq!(summary.ranks.iter().map(|r| r.blocks_computed).sum::<usize>(), 6);

        let filename = std::env::temp_dir().join(format!("lcs_wavefront_summary_{}.json", std::process::id()));
        summary.write(&filename).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&filename).unwrap()).unwrap();
        std::fs::remove_file(&filename).unwrap();
        assert_eq!(value["score"], 4);
        assert_eq!(value["ranks"].as_array().unwrap().len(), 2);
    }
}
