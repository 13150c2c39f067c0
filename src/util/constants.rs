// CrawlScope - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CrawlScope";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CrawlScope";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Record shape
// =============================================================================

/// Key of the natural (best-effort) identity component of a record.
pub const FIELD_URL: &str = "url";

/// Page title field.
pub const FIELD_TITLE: &str = "title";

/// Extracted page text field.
pub const FIELD_TEXT: &str = "text";

/// Fetch timestamp field. Kept as the crawler wrote it; never parsed.
pub const FIELD_FETCHED_AT: &str = "fetched_at";

/// HTTP content type field.
pub const FIELD_CONTENT_TYPE: &str = "content_type";

/// Substituted for the url when building the synthetic id of a record
/// that has no (or an empty) url.
pub const ID_FALLBACK_TOKEN: &str = "item";

/// Separator between the natural key and the ingestion index in a record id.
pub const ID_SEPARATOR: &str = "::";

/// Key under which the synthetic id is written in JSON exports. Prefixed so
/// it never overwrites an `id` field the crawler produced.
pub const SERIALIZED_ID_KEY: &str = "__id";

// =============================================================================
// Filtering and display
// =============================================================================

/// Bucket name for records whose url has no parsable hostname.
pub const UNGROUPED_BUCKET: &str = "ungrouped";

/// Number of filtered records rendered in a listing. Rendering cost only;
/// exports always cover the full filtered view.
pub const DISPLAY_CAP: usize = 200;

/// Minimum user-configurable display cap.
pub const MIN_DISPLAY_CAP: usize = 1;

/// Maximum user-configurable display cap.
pub const MAX_DISPLAY_CAP: usize = 10_000;

// =============================================================================
// Export
// =============================================================================

/// CSV columns, in output order.
pub const CSV_COLUMNS: [&str; 5] = [
    FIELD_URL,
    FIELD_TITLE,
    FIELD_TEXT,
    FIELD_FETCHED_AT,
    FIELD_CONTENT_TYPE,
];

/// Default file name offered for CSV exports.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "export.csv";

/// Maximum number of records that can be exported in a single operation.
pub const MAX_EXPORT_ENTRIES: usize = 5_000_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of an input line included in debug output.
/// Prevents dumping whole page bodies into the log.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
