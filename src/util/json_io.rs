use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// True if the path should be treated as gzip compressed
fn is_gzip(filename: &Path) -> bool {
    filename.extension().unwrap_or_default() == "gz"
}

/// Saves a serializable struct as pretty JSON, gzip compressed if the name ends in `.gz`.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let file = File::create(out_filename)
        .with_context(|| format!("Error while creating {out_filename:?}:"))?;
    let file: Box<dyn Write> = if is_gzip(out_filename) {
        Box::new(flate2::write::GzEncoder::new(file, flate2::Compression::best()))
    } else {
        Box::new(file)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
    writer.flush()
        .with_context(|| format!("Error while flushing output to {out_filename:?}:"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;

    #[test]
    fn test_save_json() {
        let data: BTreeMap<String, Vec<u16>> = [
            ("halo".to_string(), vec![0, 1, 2]),
            ("corner".to_string(), vec![7])
        ].into_iter().collect();

        let folder = std::env::temp_dir().join(format!("lcs_wavefront_json_{}", std::process::id()));
        std::fs::create_dir_all(&folder).unwrap();

        let plain_fn = folder.join("plain.json");
        save_json(&data, &plain_fn).unwrap();
        let plain = std::fs::read_to_string(&plain_fn).unwrap();

        let packed_fn = folder.join("packed.json.gz");
        save_json(&data, &packed_fn).unwrap();
        let mut unpacked = String::new();
        flate2::read::MultiGzDecoder::new(File::open(&packed_fn).unwrap())
            .read_to_string(&mut unpacked)
            .unwrap();
        assert_eq!(unpacked, plain);

        let loaded: BTreeMap<String, Vec<u16>> = serde_json::from_str(&plain).unwrap();
        assert_eq!(loaded, data);
        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn test_unwritable_path() {
        let result = save_json(&vec![1u16], Path::new("/this/path/does/not/exist.json"));
        assert!(result.is_err());
    }
}
