// CrawlScope - core/export.rs
//
// CSV and JSON export of a filtered view.
// Core layer: writes to any Write trait object; the app layer owns files.

use crate::core::model::NormalizedRecord;
use crate::util::constants::{CSV_COLUMNS, DEFAULT_EXPORT_FILE_NAME, MAX_EXPORT_ENTRIES};
use crate::util::error::ExportError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

/// Export a filtered view as CSV.
///
/// Writes the bare header `url,title,text,fetched_at,content_type`, then one
/// row per record with every field double-quoted and embedded quotes doubled.
/// Each line ends in `\n`. An empty view writes nothing at all.
///
/// `export_path` is only used to give errors context.
pub fn export_csv<W: Write>(
    view: &[&NormalizedRecord],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    if view.is_empty() {
        return Ok(0);
    }
    if view.len() > MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count: view.len(),
            max: MAX_EXPORT_ENTRIES,
        });
    }

    // The header is written unquoted; the csv writer would quote it too.
    writeln!(writer, "{}", CSV_COLUMNS.join(",")).map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut count = 0;
    for record in view {
        let fields: Vec<Cow<'_, str>> = CSV_COLUMNS.iter().map(|c| record.field_text(c)).collect();
        csv_writer
            .write_record(fields.iter().map(|f| f.as_bytes()))
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(rows = count, "CSV export written");
    Ok(count)
}

/// Render a filtered view as CSV text, rows joined by `\n` with no trailing
/// line break.
///
/// Returns `Ok(None)` for an empty view: there is nothing to offer, not even
/// a header. An oversized view is an error, not an empty result.
pub fn to_csv(view: &[&NormalizedRecord]) -> Result<Option<String>, ExportError> {
    if view.is_empty() {
        return Ok(None);
    }

    let export_path = Path::new(DEFAULT_EXPORT_FILE_NAME);
    let mut buf = Vec::new();
    export_csv(view, &mut buf, export_path)?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
}

/// Export a filtered view as a pretty-printed JSON array.
///
/// Each record is written with all of its original fields plus its synthetic
/// id under `__id`.
pub fn export_json<W: Write>(
    view: &[&NormalizedRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    if view.len() > MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count: view.len(),
            max: MAX_EXPORT_ENTRIES,
        });
    }
    serde_json::to_writer_pretty(writer, view).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(view.len())
}
