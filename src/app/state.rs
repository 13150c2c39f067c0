// CrawlScope - app/state.rs
//
// Session state: the loaded record set, the current filter, and the derived
// filtered view. The view is stored as indices into `records` and recomputed
// in full whenever either input changes.

use crate::core::export;
use crate::core::filter::{self, FilterState};
use crate::core::model::{DomainGroup, FilteredView, IngestReport, NormalizedRecord, RecordSet};
use crate::core::{normalize, parser};
use crate::platform::fs;
use crate::util::error::{ExportError, LoadError};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

type ExportSink = BufWriter<File>;

/// Top-level session state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Records of the most recent load, in ingestion order.
    pub records: RecordSet,

    /// Current filter configuration.
    pub filter_state: FilterState,

    /// Indices into `records` matching `filter_state`, in order.
    pub filtered_indices: Vec<usize>,

    /// File the current records came from, if any.
    pub source_path: Option<PathBuf>,

    /// Ingestion statistics of the most recent load.
    pub last_report: Option<IngestReport>,

    /// One-line human-readable status.
    pub status_message: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status_message: "Ready. Load a JSON or JSONL crawl dump to begin.".to_string(),
            ..Default::default()
        }
    }

    /// Ingest `text`, replacing the current records wholesale.
    ///
    /// The filter state is kept and re-applied to the new records.
    pub fn load_text(&mut self, text: &str, source: Option<PathBuf>) -> IngestReport {
        let ingested = parser::parse_with_report(text);
        let report = ingested.report;
        self.records = normalize::normalize_all(ingested.records);
        self.source_path = source;
        self.apply_filters();

        self.status_message = if report.lines_skipped > 0 {
            format!(
                "Loaded {} records ({}); {} malformed lines skipped.",
                self.records.len(),
                report.mode,
                report.lines_skipped
            )
        } else {
            format!("Loaded {} records ({}).", self.records.len(), report.mode)
        };

        tracing::info!(
            source = ?self.source_path,
            records = self.records.len(),
            mode = %report.mode,
            skipped = report.lines_skipped,
            "Records loaded"
        );

        self.last_report = Some(report.clone());
        report
    }

    /// Read and ingest a dump file.
    ///
    /// On a read error the current records are left untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<IngestReport, LoadError> {
        let text = fs::read_file_lossy(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(self.load_text(&text, Some(path.to_path_buf())))
    }

    /// Replace the filter state and recompute the view.
    pub fn set_filter(&mut self, filter_state: FilterState) {
        self.filter_state = filter_state;
        self.apply_filters();
    }

    /// Recompute filtered indices from current records and filter state.
    pub fn apply_filters(&mut self) {
        self.filtered_indices = filter::filter_indices(&self.records, &self.filter_state);
    }

    /// The full filtered view.
    pub fn filtered_records(&self) -> FilteredView<'_> {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.records.get(idx))
            .collect()
    }

    /// The first `cap` records of the filtered view, for rendering.
    pub fn display_records(&self, cap: usize) -> FilteredView<'_> {
        self.filtered_indices
            .iter()
            .take(cap)
            .filter_map(|&idx| self.records.get(idx))
            .collect()
    }

    /// The full filtered view bucketed per the filter's `group_by`.
    pub fn groups(&self) -> Vec<DomainGroup<'_>> {
        filter::group_view(&self.filtered_records(), self.filter_state.group_by)
    }

    /// CSV text of the full filtered view, or `None` when it is empty.
    pub fn to_csv(&self) -> Result<Option<String>, ExportError> {
        export::to_csv(&self.filtered_records())
    }

    /// Write the full filtered view as CSV to `path`.
    ///
    /// An empty view is a no-op: no file is created and `Ok(0)` is returned.
    pub fn export_csv_to(&self, path: &Path) -> Result<usize, ExportError> {
        self.export_to(path, export::export_csv::<ExportSink>)
    }

    /// Write the full filtered view as a JSON array to `path`.
    ///
    /// An empty view is a no-op, as for CSV.
    pub fn export_json_to(&self, path: &Path) -> Result<usize, ExportError> {
        self.export_to(path, export::export_json::<ExportSink>)
    }

    fn export_to<F>(&self, path: &Path, write: F) -> Result<usize, ExportError>
    where
        F: FnOnce(&[&NormalizedRecord], ExportSink, &Path) -> Result<usize, ExportError>,
    {
        let view = self.filtered_records();
        if view.is_empty() {
            tracing::info!(path = %path.display(), "Nothing to export");
            return Ok(0);
        }

        let writer = fs::create_export_file(path).map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let count = write(&view[..], writer, path)?;

        tracing::info!(path = %path.display(), records = count, "Export complete");
        Ok(count)
    }

    /// Drop all records and reset the filter.
    pub fn clear(&mut self) {
        self.records.clear();
        self.filtered_indices.clear();
        self.filter_state = FilterState::default();
        self.source_path = None;
        self.last_report = None;
        self.status_message = "Ready.".to_string();
    }
}
