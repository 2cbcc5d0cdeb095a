use std::io::Write;
use tempfile::NamedTempFile;

/// Temporary input file holding exactly `bytes`.
pub fn file_with(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
