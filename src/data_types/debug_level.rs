use serde::Serialize;
use strum_macros::{EnumIter, EnumString};

/// Runtime replacement for compile-time debug toggles; combines with the log level chosen by `-v`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, strum_macros::Display, EnumIter, EnumString, Serialize, clap::ValueEnum)]
pub enum DebugLevel {
    /// No extra debug output
    #[default]
    #[strum(ascii_case_insensitive, serialize = "off")]
    #[clap(name = "off")]
    Off,
    /// Logs every diagonal and every block a rank processes
    #[strum(ascii_case_insensitive, serialize = "steps")]
    #[clap(name = "steps")]
    Steps,
    /// Step tracing plus a full score-matrix dump gathered at the root
    #[strum(ascii_case_insensitive, serialize = "matrix")]
    #[clap(name = "matrix")]
    Matrix,
}

impl DebugLevel {
    /// Returns true if per-diagonal/per-block steps should be reported at info level
    pub fn traces_steps(&self) -> bool {
        match self {
            DebugLevel::Steps |
            DebugLevel::Matrix => true,
            DebugLevel::Off => false
        }
    }

    /// Returns true if the full matrix must be gathered and printed
    pub fn dumps_matrix(&self) -> bool {
        match self {
            DebugLevel::Matrix => true,
            DebugLevel::Off |
            DebugLevel::Steps => false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(DebugLevel::from_str("STEPS").unwrap(), DebugLevel::Steps);
        assert_eq!(DebugLevel::from_str("matrix").unwrap(), DebugLevel::Matrix);
        assert!(DebugLevel::from_str("verbose").is_err());
        assert_eq!(DebugLevel::Off.to_string(), "off");
        assert_eq!(DebugLevel::default(), DebugLevel::Off);
    }

    #[test]
    fn test_display_round_trips() {
        for level in DebugLevel::iter() {
            assert_eq!(DebugLevel::from_str(&level.to_string()).unwrap(), level);
        }
        assert_eq!(DebugLevel::iter().count(), 3);
    }

    #[test]
    fn test_levels() {
        assert!(!DebugLevel::Off.traces_steps());
        assert!(DebugLevel::Steps.traces_steps());
        assert!(!DebugLevel::Steps.dumps_matrix());
        assert!(DebugLevel::Matrix.traces_steps());
        assert!(DebugLevel::Matrix.dumps_matrix());
    }
}
