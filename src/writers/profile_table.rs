use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::data_types::profile_stats::{AMDAHL_PROCESSORS, PhaseStats, ProfileStats};

/// One row of the profiling table
#[derive(Serialize)]
struct ProfileRow {
    /// Phase or Amdahl label
    component: String,
    /// Mean seconds, or the speedup for Amdahl rows
    mean: f64,
    /// Population standard deviation; empty where it does not apply
    stddev: Option<f64>,
    /// Share of the sequential total; empty for Amdahl rows
    percentage: Option<f64>
}

impl ProfileRow {
    fn phase(component: &str, stats: &PhaseStats, total: f64) -> Self {
        Self {
            component: component.to_string(),
            mean: stats.mean,
            stddev: Some(stats.stddev),
            percentage: Some(percent(stats.mean, total))
        }
    }
}

fn percent(value: f64, total: f64) -> f64 {
    if total > 0.0 { 100.0 * value / total } else { 0.0 }
}

/// Writes the profiling results as a table
/// # Arguments
/// * `stats` - the aggregated profile
/// * `filename` - the filename for the output (tsv/csv)
/// # Errors
/// * if the file cannot be created or written
pub fn write_profile_table(stats: &ProfileStats, filename: &Path) -> csv::Result<()> {
    // modify the delimiter to "," if it ends with .csv
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };
    let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)?;

    let total = stats.total_sequential();
    csv_writer.serialize(ProfileRow {
        component: "file_io".to_string(),
        mean: stats.file_io,
        stddev: None,
        percentage: Some(percent(stats.file_io, total))
    })?;
    csv_writer.serialize(ProfileRow::phase("memory_allocation", &stats.alloc, total))?;
    csv_writer.serialize(ProfileRow::phase("matrix_initialization", &stats.init, total))?;
    csv_writer.serialize(ProfileRow::phase("lcs_computation", &stats.compute, total))?;
    csv_writer.serialize(ProfileRow {
        component: "total_sequential".to_string(),
        mean: total,
        stddev: Some(stats.total.stddev),
        percentage: Some(100.0)
    })?;

    // speedup rows
    for processors in AMDAHL_PROCESSORS {
        csv_writer.serialize(ProfileRow {
            component: format!("amdahl_{processors}"),
            mean: stats.amdahl_speedup(processors),
            stddev: None,
            percentage: None
        })?;
    }
    csv_writer.serialize(ProfileRow {
        component: "amdahl_max".to_string(),
        mean: stats.max_speedup(),
        stddev: None,
        percentage: None
    })?;
    csv_writer.flush()?;
    Ok(())
}
