// CrawlScope - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies. These types are the shared vocabulary across
// all layers.

use crate::util::constants;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;

// =============================================================================
// Raw and normalised records
// =============================================================================

/// One ingested element, exactly as the JSON parser produced it.
///
/// Usually an object, but no shape is required: arrays of mixed values are
/// passed through untouched and only the normaliser decides what to keep.
pub type RawRecord = Value;

/// A crawled-page record with a synthetic identity.
///
/// All fields of the source object are preserved in their original order.
/// The well-known fields (`url`, `title`, `text`, `fetched_at`,
/// `content_type`) are read through accessors that treat a missing field as
/// blank; nothing here ever fails on an unexpected type.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// `<url or "item">::<ingestion index>`. Unique within one load.
    pub id: String,

    /// Every field of the raw object, unchanged.
    pub fields: Map<String, Value>,
}

impl NormalizedRecord {
    /// Raw value of `key`, if present.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text rendering of `key` used by search and export.
    ///
    /// Missing and `null` render as `""`, strings as-is, anything else as
    /// compact JSON (`42`, `true`, `["a","b"]`).
    pub fn field_text(&self, key: &str) -> Cow<'_, str> {
        match self.field(key) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    pub fn url(&self) -> Cow<'_, str> {
        self.field_text(constants::FIELD_URL)
    }

    pub fn title(&self) -> Cow<'_, str> {
        self.field_text(constants::FIELD_TITLE)
    }

    pub fn text(&self) -> Cow<'_, str> {
        self.field_text(constants::FIELD_TEXT)
    }

    pub fn fetched_at(&self) -> Cow<'_, str> {
        self.field_text(constants::FIELD_FETCHED_AT)
    }

    pub fn content_type(&self) -> Cow<'_, str> {
        self.field_text(constants::FIELD_CONTENT_TYPE)
    }
}

/// Serialises as a flat object: the synthetic id under `__id`, then every
/// original field. A stale `__id` carried in from a previous export is
/// dropped so the key is never emitted twice.
impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stale = usize::from(self.fields.contains_key(constants::SERIALIZED_ID_KEY));
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1 - stale))?;
        map.serialize_entry(constants::SERIALIZED_ID_KEY, &self.id)?;
        for (k, v) in &self.fields {
            if k != constants::SERIALIZED_ID_KEY {
                map.serialize_entry(k, v)?;
            }
        }
        map.end()
    }
}

/// Ordered records of one load. Replaced wholesale on every load.
pub type RecordSet = Vec<NormalizedRecord>;

/// Ordered subsequence of a `RecordSet` selected by the filter pipeline.
///
/// Borrowed from the owning set; recomputed, never edited in place.
pub type FilteredView<'a> = Vec<&'a NormalizedRecord>;

// =============================================================================
// Ingestion report
// =============================================================================

/// Which strategy of the ingestion fallback chain produced the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    /// The whole text was one JSON array.
    Array,

    /// The whole text was one JSON value that is not an array.
    SingleValue,

    /// Strict parse failed; records came from individual lines.
    #[default]
    LineDelimited,
}

impl IngestMode {
    pub fn label(&self) -> &'static str {
        match self {
            IngestMode::Array => "JSON array",
            IngestMode::SingleValue => "single JSON value",
            IngestMode::LineDelimited => "line-delimited JSON",
        }
    }
}

impl std::fmt::Display for IngestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics for one ingestion pass.
///
/// Purely informational: ingestion never fails, and callers that ignore the
/// report get exactly the silent behaviour of `parser::parse`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Strategy that produced the records.
    pub mode: IngestMode,

    /// Non-blank lines examined in line-delimited mode (0 otherwise).
    pub lines_seen: usize,

    /// Non-blank lines that were not valid JSON and were dropped.
    pub lines_skipped: usize,
}

// =============================================================================
// Domain grouping (presentation metadata)
// =============================================================================

/// One bucket of a filtered view partitioned by hostname.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainGroup<'a> {
    /// Hostname, or `"ungrouped"` for records without a parsable url host.
    pub key: String,

    /// Members in their filtered-view order.
    pub records: Vec<&'a NormalizedRecord>,
}
