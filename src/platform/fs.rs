// CrawlScope - platform/fs.rs
//
// Filesystem helpers for reading dumps and writing exports.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

const UTF8_BOM: char = '\u{FEFF}';

/// Read the full content of a file as a string.
///
/// Crawl dumps are not always clean UTF-8; invalid sequences are replaced
/// rather than rejecting the whole file, in keeping with ingestion's
/// tolerance of partially corrupt input. A leading byte-order mark is
/// dropped; JSON parsers reject it.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let decoded = String::from_utf8_lossy(&bytes);
    let text: &str = &decoded;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_owned())
}

/// Create (or truncate) `path` for buffered writing, creating parent
/// directories as needed.
pub fn create_export_file(path: &Path) -> io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Resolve an export target: a directory gets `default_name` appended.
pub fn resolve_export_path(target: &Path, default_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(default_name)
    } else {
        target.to_path_buf()
    }
}
