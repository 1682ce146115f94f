use indicatif::{ProgressBar, ProgressState, ProgressStyle};

/// Progress bar styling shared by the timed loops
pub fn get_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}); ETA: {eta_precise}; {per_run} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn std::fmt::Write| write!(w, "{:.1}%", state.fraction()*100.0).unwrap())
        .with_key("per_run", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            // a run is usually longer than a second, so report seconds per run instead of runs per second
            let per_sec = state.per_sec();
            if per_sec > 0.0 {
                write!(w, "{:.3}s/run", 1.0 / per_sec).unwrap();
            }
        })
        .progress_chars("##-")
}

/// Builds a styled bar over `len` steps with a leading message
pub fn styled_bar(len: u64, message: &str) -> ProgressBar {
    ProgressBar::new(len)
        .with_style(get_progress_style())
        .with_message(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_bar() {
        let bar = styled_bar(3, "profiling");
        bar.inc(2);
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.message(), "profiling");
        bar.finish_and_clear();
    }
}
