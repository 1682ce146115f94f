use serde::Serialize;

/// Processor counts reported in the Amdahl analysis
pub const AMDAHL_PROCESSORS: [usize; 6] = [2, 4, 8, 12, 16, 32];

/// Wall-clock seconds spent in each phase of a single sequential run
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    /// Allocating the score matrix
    pub alloc: f64,
    /// Writing the DP base case
    pub init: f64,
    /// The DP fill itself
    pub compute: f64,
    /// Everything in the run, including teardown
    pub total: f64
}

/// Mean and population standard deviation for one phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PhaseStats {
    pub mean: f64,
    pub stddev: f64
}

impl PhaseStats {
    /// Computes stats over some values; empty input gives zeros
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            stddev: variance.sqrt()
        }
    }
}

/// Summary of a profiling session
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileStats {
    /// Length of sequence A
    pub seq_a_len: usize,
    /// Length of sequence B
    pub seq_b_len: usize,
    /// Number of timed runs
    pub runs: usize,
    /// File loading happens once, so there is no spread
    pub file_io: f64,
    pub alloc: PhaseStats,
    pub init: PhaseStats,
    pub compute: PhaseStats,
    pub total: PhaseStats
}

impl ProfileStats {
    /// Aggregates raw timings into the summary
    /// # Arguments
    /// * `seq_a_len` - length of sequence A
    /// * `seq_b_len` - length of sequence B
    /// * `file_io` - one-time file loading cost in seconds
    /// * `timings` - one entry per run
    pub fn from_timings(seq_a_len: usize, seq_b_len: usize, file_io: f64, timings: &[PhaseTimings]) -> Self {
        let alloc: Vec<f64> = timings.iter().map(|t| t.alloc).collect();
        let init: Vec<f64> = timings.iter().map(|t| t.init).collect();
        let compute: Vec<f64> = timings.iter().map(|t| t.compute).collect();
        let total: Vec<f64> = timings.iter().map(|t| t.total).collect();
        Self {
            seq_a_len,
            seq_b_len,
            runs: timings.len(),
            file_io,
            alloc: PhaseStats::from_values(&alloc),
            init: PhaseStats::from_values(&init),
            compute: PhaseStats::from_values(&compute),
            total: PhaseStats::from_values(&total)
        }
    }

    /// Sequential time as the sum of the phase means plus the one-time I/O
    pub fn total_sequential(&self) -> f64 {
        self.file_io + self.alloc.mean + self.init.mean + self.compute.mean
    }

    /// The fraction of sequential time spent in the parallelizable DP fill
    pub fn parallel_fraction(&self) -> f64 {
        let total = self.total_sequential();
        if total > 0.0 {
            self.compute.mean / total
        } else {
            0.0
        }
    }

    /// Amdahl's law speedup with `processors` workers
    pub fn amdahl_speedup(&self, processors: usize) -> f64 {
        let p = self.parallel_fraction();
        1.0 / ((1.0 - p) + p / processors as f64)
    }

    /// Upper bound on speedup with unlimited workers; infinite if nothing is sequential
    pub fn max_speedup(&self) -> f64 {
        1.0 / (1.0 - self.parallel_fraction())
    }

    /// Percentage of the sequential total a phase represents
    fn percent(&self, value: f64) -> f64 {
        let total = self.total_sequential();
        if total > 0.0 { 100.0 * value / total } else { 0.0 }
    }

    /// Human readable profiling table and Amdahl analysis
    pub fn render(&self) -> String {
        let wide = "=".repeat(54);
        let thin = "-".repeat(54);
        let mut lines = vec![
            wide.clone(),
            format!("PROFILING RESULTS (Statistics over {} runs)", self.runs),
            wide.clone(),
            format!("Sequence A size: {}", self.seq_a_len),
            format!("Sequence B size: {}", self.seq_b_len),
            thin.clone(),
            "Component                    | Mean Time (s)  | Std Dev (s)  | Percentage".to_string(),
            thin.clone(),
            format!("File I/O                     | {:<14.6} | (one-time)   | {:>7.2}%", self.file_io, self.percent(self.file_io))
        ];
        for (label, stats) in [
            ("Memory Allocation", &self.alloc),
            ("Matrix Initialization", &self.init),
            ("LCS Computation", &self.compute)
        ] {
            lines.push(format!("{label:<28} | {:<14.6} | {:<12.6} | {:>7.2}%", stats.mean, stats.stddev, self.percent(stats.mean)));
        }
        lines.push(thin);
        lines.push(format!("TOTAL SEQUENTIAL TIME (Mean) | {:<14.6} | {:<12.6} |  100.00%", self.total_sequential(), self.total.stddev));
        lines.push(wide);

        let p = self.parallel_fraction();
        lines.extend([
            String::new(),
            "AMDAHL'S LAW ANALYSIS (based on mean times):".to_string(),
            "-".repeat(40),
            format!("Parallelizable portion (P): {p:.4} ({:.2}%)", p * 100.0),
            format!("Sequential portion (1-P):   {:.4} ({:.2}%)", 1.0 - p, (1.0 - p) * 100.0),
            String::new(),
            "Theoretical speedup limits:".to_string()
        ]);
        for processors in AMDAHL_PROCESSORS {
            lines.push(format!("  {processors:>3} processors: {:.2}x speedup", self.amdahl_speedup(processors)));
        }
        lines.push(format!("  Inf processors: {:.2}x speedup (theoretical maximum)", self.max_speedup()));
        lines.push("=".repeat(40));
        lines.join("\n")
    }
}
