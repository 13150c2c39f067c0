// CrawlScope - tests/e2e_pipeline.rs
//
// End-to-end tests for the load -> normalise -> filter -> export pipeline.
//
// These tests exercise real fixture files on disk, real serde_json parsing,
// real url hostname extraction and the real csv writer. No mocks, no stubs.

use crawlscope::app::state::AppState;
use crawlscope::core::filter::{self, FilterState, GroupBy};
use crawlscope::core::model::IngestMode;
use crawlscope::core::{export, normalize, parser};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn loaded(name: &str) -> AppState {
    let mut state = AppState::new();
    state
        .load_file(&fixture(name))
        .unwrap_or_else(|e| panic!("fixture {name} should load: {e}"));
    state
}

fn filtered_ids(state: &AppState) -> Vec<String> {
    state
        .filtered_records()
        .iter()
        .map(|r| r.id.clone())
        .collect()
}

// =============================================================================
// Ingestion E2E
// =============================================================================

/// A partially corrupt JSONL dump loads every valid line, in order.
#[test]
fn e2e_jsonl_dump_skips_corrupt_lines() {
    let state = loaded("crawl_sample.jsonl");
    let report = state.last_report.clone().expect("report after load");

    assert_eq!(report.mode, IngestMode::LineDelimited);
    assert_eq!(report.lines_seen, 7);
    assert_eq!(report.lines_skipped, 2);

    let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "https://docs.example.com/intro::0",
            "https://blog.other.org/post/7::1",
            "item::2",
            "https://docs.example.com/faq::3",
            "https://docs.example.com/faq::4",
        ]
    );
    // Unknown fields survive normalisation.
    assert_eq!(state.records[3].field("status"), Some(&serde_json::json!(200)));
}

/// A pretty-printed JSON array loads as one document.
#[test]
fn e2e_json_array_dump_loads_as_document() {
    let state = loaded("crawl_sample.json");
    let report = state.last_report.clone().expect("report after load");
    assert_eq!(report.mode, IngestMode::Array);
    assert_eq!(report.lines_skipped, 0);
    assert_eq!(state.records.len(), 3);
}

/// Loading a second file replaces, never appends.
#[test]
fn e2e_second_load_replaces_record_set() {
    let mut state = loaded("crawl_sample.jsonl");
    state.load_file(&fixture("crawl_sample.json")).unwrap();
    assert_eq!(state.records.len(), 3);
    assert_eq!(state.records[0].id, "https://shop.example.com/item/1::0");
}

/// Dumps saved with a UTF-8 byte-order mark load completely in either layout.
#[test]
fn e2e_bom_prefixed_dumps_load_every_record() {
    let dir = TempDir::new().unwrap();

    let array_path = dir.path().join("bom.json");
    std::fs::write(
        &array_path,
        "\u{FEFF}[\n {\"url\":\"https://a.example.com/\",\"title\":\"A\"},\n {\"url\":\"https://b.example.com/\",\"title\":\"B\"}\n]\n",
    )
    .unwrap();
    let mut state = AppState::new();
    let report = state.load_file(&array_path).unwrap();
    assert_eq!(report.mode, IngestMode::Array);
    assert_eq!(report.lines_skipped, 0);
    assert_eq!(state.records.len(), 2);
    assert_eq!(state.records[0].id, "https://a.example.com/::0");

    let lines_path = dir.path().join("bom.jsonl");
    std::fs::write(
        &lines_path,
        "\u{FEFF}{\"title\":\"A\"}\n{\"title\":\"B\"}\n",
    )
    .unwrap();
    let report = state.load_file(&lines_path).unwrap();
    assert_eq!(report.mode, IngestMode::LineDelimited);
    assert_eq!(report.lines_skipped, 0);
    let titles: Vec<String> = state.records.iter().map(|r| r.title().into_owned()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

/// Re-ingesting the same text produces the same ids.
#[test]
fn e2e_ids_are_stable_across_loads() {
    let text = std::fs::read_to_string(fixture("crawl_sample.jsonl")).unwrap();
    let first: Vec<String> = normalize::normalize_all(parser::parse(&text))
        .into_iter()
        .map(|r| r.id)
        .collect();
    let second: Vec<String> = normalize::normalize_all(parser::parse(&text))
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(first, second);
}

// =============================================================================
// Filtering E2E
// =============================================================================

#[test]
fn e2e_domain_filter_on_fixture() {
    let mut state = loaded("crawl_sample.jsonl");
    state.set_filter(FilterState {
        domain_substring: "docs.example".to_string(),
        ..Default::default()
    });
    assert_eq!(
        filtered_ids(&state),
        vec![
            "https://docs.example.com/intro::0",
            "https://docs.example.com/faq::3",
            "https://docs.example.com/faq::4",
        ]
    );
}

#[test]
fn e2e_plain_and_regex_search_on_fixture() {
    let mut state = loaded("crawl_sample.jsonl");

    state.set_filter(FilterState {
        query: "FAQ".to_string(),
        ..Default::default()
    });
    assert_eq!(
        filtered_ids(&state),
        vec!["https://docs.example.com/faq::3", "https://docs.example.com/faq::4"]
    );

    state.set_filter(FilterState {
        query: r"^release\b".to_string(),
        regex_mode: true,
        ..Default::default()
    });
    assert_eq!(filtered_ids(&state), vec!["https://blog.other.org/post/7::1"]);
}

#[test]
fn e2e_invalid_regex_leaves_view_unfiltered() {
    let mut state = loaded("crawl_sample.jsonl");
    let filter_state = FilterState {
        query: "(".to_string(),
        regex_mode: true,
        ..Default::default()
    };
    assert!(filter_state.validate_regex().is_err());
    state.set_filter(filter_state);
    assert_eq!(state.filtered_indices.len(), state.records.len());
}

#[test]
fn e2e_grouping_partitions_without_dropping() {
    let mut state = loaded("crawl_sample.json");
    state.set_filter(FilterState {
        group_by: GroupBy::Domain,
        ..Default::default()
    });
    let groups = state.groups();
    let summary: Vec<(String, usize)> = groups
        .iter()
        .map(|g| (g.key.clone(), g.records.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("shop.example.com".to_string(), 2),
            ("news.other.net".to_string(), 1),
        ]
    );
}

// =============================================================================
// Export E2E
// =============================================================================

/// Exported CSV reads back through a standard CSV reader with every field
/// intact, including embedded quotes and commas.
#[test]
fn e2e_csv_export_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.csv");
    let state = loaded("crawl_sample.jsonl");

    assert_eq!(state.export_csv_to(&path).unwrap(), 5);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["url", "title", "text", "fetched_at", "content_type"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(
        &rows[0][2],
        "Welcome to the \"Example\" documentation, part one."
    );
    assert_eq!(&rows[2][0], "");
    assert_eq!(&rows[2][1], "Orphan page");
    assert_eq!(&rows[3][4], "text/html; charset=utf-8");
}

/// The raw CSV text uses doubled quotes and quotes every data field.
#[test]
fn e2e_csv_text_quoting() {
    let mut state = AppState::new();
    state.load_text(
        r#"{"url":"u","title":"t","text":"x,y","fetched_at":"f","content_type":"c"}"#,
        None,
    );
    let csv = state.to_csv().unwrap().expect("non-empty view");
    assert_eq!(
        csv,
        "url,title,text,fetched_at,content_type\n\"u\",\"t\",\"x,y\",\"f\",\"c\""
    );
}

/// Exports ignore the display cap.
#[test]
fn e2e_export_is_not_capped() {
    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("big.jsonl");
    let dump: String = (0..450)
        .map(|i| format!("{{\"url\":\"https://s{}.example.com/\",\"title\":\"p{i}\"}}\n", i % 7))
        .collect();
    std::fs::write(&dump_path, dump).unwrap();

    let mut state = AppState::new();
    state.load_file(&dump_path).unwrap();
    assert_eq!(state.display_records(200).len(), 200);

    let csv_path = dir.path().join("out.csv");
    assert_eq!(state.export_csv_to(&csv_path).unwrap(), 450);
}

/// Empty input flows through every stage without producing output.
#[test]
fn e2e_empty_input_produces_nothing() {
    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("empty.json");
    std::fs::write(&dump_path, "").unwrap();

    let mut state = AppState::new();
    state.load_file(&dump_path).unwrap();
    assert!(state.records.is_empty());

    state.set_filter(FilterState {
        query: "anything".to_string(),
        domain_substring: "example".to_string(),
        regex_mode: true,
        group_by: GroupBy::Domain,
    });
    assert!(state.filtered_records().is_empty());
    assert!(state.groups().is_empty());

    let csv_path = dir.path().join("export.csv");
    assert_eq!(state.export_csv_to(&csv_path).unwrap(), 0);
    assert!(!csv_path.exists());
    assert!(matches!(
        export::to_csv(&filter::apply_filters(&state.records, &state.filter_state)),
        Ok(None)
    ));
}
