use anyhow::Context;
use log::debug;
use std::path::Path;

use crate::data_types::sequence_pair::SequencePair;

/// Loads a sequence file. Every `\n` byte is dropped and all remaining bytes are kept as symbols.
/// # Arguments
/// * `filename` - the file to load
/// # Errors
/// * if the file cannot be read
pub fn load_sequence(filename: &Path) -> anyhow::Result<Vec<u8>> {
    let mut symbols = std::fs::read(filename)
        .with_context(|| format!("Error while reading sequence file {filename:?}"))?;
    symbols.retain(|&b| b != b'\n');
    debug!("Loaded {} symbols from {filename:?}", symbols.len());
    Ok(symbols)
}

/// Loads both sequence files into a checked pair.
/// # Arguments
/// * `filename_a` - sequence A, the column axis
/// * `filename_b` - sequence B, the row axis
/// # Errors
/// * if either file cannot be read
/// * if the pair is too long to score
pub fn load_sequence_pair(filename_a: &Path, filename_b: &Path) -> anyhow::Result<SequencePair> {
    let seq_a = load_sequence(filename_a)?;
    let seq_b = load_sequence(filename_b)?;
    SequencePair::new(seq_a, seq_b)
        .with_context(|| format!("Error while pairing {filename_a:?} with {filename_b:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Writes a scratch file unique to this test process
    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let filename = std::env::temp_dir().join(format!("lcs_wavefront_{}_{name}", std::process::id()));
        std::fs::write(&filename, contents).unwrap();
        filename
    }

    #[test]
    fn test_newlines_are_stripped() {
        let filename = scratch_file("wrapped.txt", b"ACGT\nAC\r\nGT\n");
        // only \n is special, the \r survives
        assert_eq!(load_sequence(&filename).unwrap(), b"ACGTAC\rGT".to_vec());
        std::fs::remove_file(&filename).unwrap();
    }

    #[test]
    fn test_empty_file() {
        let filename = scratch_file("empty.txt", b"\n");
        assert!(load_sequence(&filename).unwrap().is_empty());
        std::fs::remove_file(&filename).unwrap();
    }

    #[test]
    fn test_pair() {
        let filename_a = scratch_file("pair_a.txt", b"ABCBDAB\n");
        let filename_b = scratch_file("pair_b.txt", b"BDCABA");
        let pair = load_sequence_pair(&filename_a, &filename_b).unwrap();
        assert_eq!(pair.seq_a(), b"ABCBDAB");
        assert_eq!(pair.seq_b(), b"BDCABA");
        std::fs::remove_file(&filename_a).unwrap();
        std::fs::remove_file(&filename_b).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let result = load_sequence(Path::new("/this/path/does/not/exist.txt"));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Error while reading sequence file"));
    }
}
