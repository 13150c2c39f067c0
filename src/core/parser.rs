// CrawlScope - core/parser.rs
//
// Tolerant ingestion of crawl dumps.
// Core layer: accepts text, never touches the filesystem directly.
//
// Ingestion is a fallback chain. Each strategy either accepts the whole text
// as one structure or declines; the first acceptance wins. The last strategy
// (line-delimited) always accepts and tolerates per-line failures, so the
// chain as a whole never fails.

use crate::core::model::{IngestMode, IngestReport, RawRecord};
use crate::util::logging::preview;
use serde_json::Value;

/// Records produced by one ingestion pass, with statistics.
#[derive(Debug, Clone, Default)]
pub struct IngestResult {
    /// Ingested elements in source order.
    pub records: Vec<RawRecord>,
    /// How they were found.
    pub report: IngestReport,
}

/// One step of the ingestion fallback chain.
pub trait IngestStrategy {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Parse the whole of `text`, or return `None` to defer to the next
    /// strategy.
    fn ingest(&self, text: &str) -> Option<IngestResult>;
}

/// Strict parse: the text must be exactly one JSON value.
///
/// An array yields its elements; any other value yields itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentStrategy;

impl IngestStrategy for DocumentStrategy {
    fn name(&self) -> &'static str {
        "document"
    }

    fn ingest(&self, text: &str) -> Option<IngestResult> {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    "Input is not a single JSON document; falling back"
                );
                return None;
            }
        };

        let (records, mode) = match value {
            Value::Array(items) => (items, IngestMode::Array),
            other => (vec![other], IngestMode::SingleValue),
        };

        Some(IngestResult {
            records,
            report: IngestReport {
                mode,
                ..Default::default()
            },
        })
    }
}

/// One JSON value per line. Blank lines are ignored and lines that are not
/// valid JSON are skipped and counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDelimitedStrategy;

impl IngestStrategy for LineDelimitedStrategy {
    fn name(&self) -> &'static str {
        "line-delimited"
    }

    fn ingest(&self, text: &str) -> Option<IngestResult> {
        let mut records = Vec::new();
        let mut lines_seen = 0usize;
        let mut lines_skipped = 0usize;

        // `str::lines` splits on both "\n" and "\r\n".
        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            lines_seen += 1;

            match serde_json::from_str::<Value>(line) {
                Ok(value) => records.push(value),
                Err(e) => {
                    lines_skipped += 1;
                    tracing::debug!(
                        line = line_idx + 1,
                        error = %e,
                        preview = preview(line),
                        "Skipping malformed line"
                    );
                }
            }
        }

        Some(IngestResult {
            records,
            report: IngestReport {
                mode: IngestMode::LineDelimited,
                lines_seen,
                lines_skipped,
            },
        })
    }
}

/// The default chain: strict document first, then line-delimited.
pub fn default_strategies() -> [&'static dyn IngestStrategy; 2] {
    [&DocumentStrategy, &LineDelimitedStrategy]
}

/// Run `strategies` in order over `text`; the first that accepts wins.
///
/// If every strategy declines, the result is empty.
pub fn ingest_with(text: &str, strategies: &[&dyn IngestStrategy]) -> IngestResult {
    for strategy in strategies {
        if let Some(result) = strategy.ingest(text) {
            tracing::debug!(
                strategy = strategy.name(),
                mode = %result.report.mode,
                records = result.records.len(),
                skipped = result.report.lines_skipped,
                "Ingestion complete"
            );
            return result;
        }
    }
    IngestResult::default()
}

/// Ingest `text` and report how it went.
pub fn parse_with_report(text: &str) -> IngestResult {
    ingest_with(text, &default_strategies())
}

/// Ingest `text` into raw records, in source order.
///
/// Never fails: malformed documents fall back to line mode, malformed lines
/// are dropped, and input with nothing parsable yields an empty sequence.
pub fn parse(text: &str) -> Vec<RawRecord> {
    parse_with_report(text).records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array() {
        let result = parse_with_report(r#"[{"url":"a"},{"url":"b"},{"url":"c"}]"#);
        assert_eq!(result.report.mode, IngestMode::Array);
        let urls: Vec<&Value> = result.records.iter().map(|r| &r["url"]).collect();
        assert_eq!(urls, vec![&json!("a"), &json!("b"), &json!("c")]);
    }

    #[test]
    fn test_parse_single_object() {
        let result = parse_with_report(r#"  {"url":"http://a.com","title":"A"}  "#);
        assert_eq!(result.report.mode, IngestMode::SingleValue);
        assert_eq!(result.records, vec![json!({"url":"http://a.com","title":"A"})]);
    }

    #[test]
    fn test_parse_array_passes_non_objects_through() {
        let records = parse(r#"[{"url":"a"}, 5, "s", null]"#);
        assert_eq!(records.len(), 4);
        assert_eq!(records[1], json!(5));
        assert_eq!(records[3], Value::Null);
    }

    #[test]
    fn test_fallback_skips_malformed_lines() {
        let text = "{\"url\":\"http://a.com\",\"title\":\"A\"}\n not json \n{\"url\":\"http://b.com\",\"title\":\"B\"}";
        let result = parse_with_report(text);
        assert_eq!(result.report.mode, IngestMode::LineDelimited);
        assert_eq!(result.report.lines_seen, 3);
        assert_eq!(result.report.lines_skipped, 1);
        let titles: Vec<&Value> = result.records.iter().map(|r| &r["title"]).collect();
        assert_eq!(titles, vec![&json!("A"), &json!("B")]);
    }

    #[test]
    fn test_fallback_handles_crlf_and_blank_lines() {
        let text = "{\"n\":1}\r\n\r\n   \r\n{\"n\":2}\r\n";
        let result = parse_with_report(text);
        assert_eq!(result.report.mode, IngestMode::LineDelimited);
        assert_eq!(result.report.lines_seen, 2);
        assert_eq!(result.records, vec![json!({"n":1}), json!({"n":2})]);
    }

    #[test]
    fn test_truncated_array_falls_back_to_lines() {
        // A dump cut off mid-write: not a document, and no line is valid JSON.
        let result = parse_with_report("[{\"url\":\"a\"},\n{\"url\":");
        assert_eq!(result.report.mode, IngestMode::LineDelimited);
        assert!(result.records.is_empty());
        assert_eq!(result.report.lines_skipped, 2);
    }

    #[test]
    fn test_empty_and_garbage_input_yield_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
        assert!(parse("<html>not a dump</html>").is_empty());
    }

    #[test]
    fn test_ingest_with_no_accepting_strategy_is_empty() {
        let result = ingest_with("[1,2]", &[]);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_line_strategy_alone_splits_pretty_documents() {
        // Forced line mode over a valid document: only self-contained lines parse.
        let text = "[\n1,\n2\n]";
        let result = ingest_with(text, &[&LineDelimitedStrategy]);
        assert_eq!(result.records, vec![json!(2)]);
        assert_eq!(result.report.lines_skipped, 3);
    }
}
