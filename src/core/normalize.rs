// CrawlScope - core/normalize.rs
//
// Assigns each ingested element a composite identity: the record's url (a
// best-effort natural key that may repeat or be missing) joined with its
// ingestion position (which cannot repeat within one load).
// Core layer: pure logic, no I/O.

use crate::core::model::{NormalizedRecord, RawRecord, RecordSet};
use crate::util::constants;
use serde_json::{Map, Value};

/// Normalise one raw element found at `index` in the ingested sequence.
///
/// All fields are copied unchanged. Elements that are not JSON objects carry
/// no fields, but still get a record (and an id) so positions stay aligned
/// with the source.
pub fn normalize(raw: RawRecord, index: usize) -> NormalizedRecord {
    let fields = match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let id = record_id(&fields, index);
    NormalizedRecord { id, fields }
}

/// Normalise a whole ingested sequence, preserving order.
pub fn normalize_all(raws: Vec<RawRecord>) -> RecordSet {
    let records: RecordSet = raws
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| normalize(raw, idx))
        .collect();

    tracing::debug!(records = records.len(), "Normalisation complete");
    records
}

fn record_id(fields: &Map<String, Value>, index: usize) -> String {
    let natural = match fields.get(constants::FIELD_URL) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    format!(
        "{}{}{index}",
        natural.as_deref().unwrap_or(constants::ID_FALLBACK_TOKEN),
        constants::ID_SEPARATOR,
    )
}
