// CrawlScope - core/filter.rs
//
// Staged filter pipeline for crawled-page records.
// Stages run in a fixed order (domain, then text) and are AND-combined;
// a blank criterion is a no-op stage.
// Core layer: pure logic, no I/O.

use crate::core::model::{DomainGroup, FilteredView, NormalizedRecord};
use crate::util::constants;
use crate::util::error::FilterError;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::str::FromStr;
use url::Url;

// =============================================================================
// Filter state
// =============================================================================

/// How a presentation layer buckets the filtered view. Never affects which
/// records are in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupBy {
    #[default]
    None,
    Domain,
}

impl GroupBy {
    pub fn label(&self) -> &'static str {
        match self {
            GroupBy::None => "none",
            GroupBy::Domain => "domain",
        }
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(GroupBy::None),
            "domain" => Ok(GroupBy::Domain),
            other => Err(format!(
                "unknown grouping '{other}'; expected \"none\" or \"domain\""
            )),
        }
    }
}

/// Complete filter configuration. Plain data: the search pattern is compiled
/// per pass by [`FilterState::compile`], so a state can be cloned, compared
/// and rebuilt freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Search text, or a regex when `regex_mode` is set. Empty = no filter.
    pub query: String,

    /// Hostname substring (case-sensitive). Empty = no filter.
    pub domain_substring: String,

    /// Interpret `query` as a case-insensitive regular expression.
    pub regex_mode: bool,

    /// Presentation bucketing.
    pub group_by: GroupBy,
}

impl FilterState {
    /// Report whether the search pattern would be ignored as invalid.
    ///
    /// Filtering itself never fails; this exists for callers that want to
    /// tell the user why a regex search is not narrowing anything.
    pub fn validate_regex(&self) -> Result<(), FilterError> {
        if !self.regex_mode || self.query.is_empty() {
            return Ok(());
        }
        build_search_regex(&self.query).map(|_| ())
    }

    /// Prepare this state for a filter pass.
    pub fn compile(&self) -> CompiledFilter<'_> {
        let text = if self.query.is_empty() {
            TextMatcher::Disabled
        } else if self.regex_mode {
            match build_search_regex(&self.query) {
                Ok(re) => TextMatcher::Pattern(re),
                Err(e) => {
                    tracing::debug!(error = %e, "Search regex invalid; text stage disabled");
                    TextMatcher::Disabled
                }
            }
        } else {
            TextMatcher::Substring(self.query.to_lowercase())
        };

        CompiledFilter {
            domain: (!self.domain_substring.is_empty()).then_some(self.domain_substring.as_str()),
            text,
        }
    }
}

fn build_search_regex(pattern: &str) -> Result<Regex, FilterError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })
}

// =============================================================================
// Compiled pipeline
// =============================================================================

/// The text stage, resolved for one pass.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    /// Empty query, or a regex that failed to compile.
    Disabled,
    /// Lower-cased needle matched against `text title url`, lower-cased.
    Substring(String),
    /// Matched against each of text, title and url separately.
    Pattern(Regex),
}

/// A [`FilterState`] ready to test records.
#[derive(Debug, Clone)]
pub struct CompiledFilter<'s> {
    domain: Option<&'s str>,
    text: TextMatcher,
}

impl CompiledFilter<'_> {
    /// True when neither stage will reject anything.
    pub fn passes_everything(&self) -> bool {
        self.domain.is_none() && matches!(self.text, TextMatcher::Disabled)
    }

    /// Run both stages against one record.
    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        self.matches_domain(record) && self.matches_text(record)
    }

    fn matches_domain(&self, record: &NormalizedRecord) -> bool {
        let Some(needle) = self.domain else {
            return true;
        };
        match hostname(&record.url()) {
            Some(host) => host.contains(needle),
            // Missing or unparsable url: excluded while the stage is active.
            None => false,
        }
    }

    fn matches_text(&self, record: &NormalizedRecord) -> bool {
        match &self.text {
            TextMatcher::Disabled => true,
            TextMatcher::Substring(needle) => {
                let haystack =
                    format!("{} {} {}", record.text(), record.title(), record.url()).to_lowercase();
                haystack.contains(needle.as_str())
            }
            TextMatcher::Pattern(re) => {
                re.is_match(&record.text()) || re.is_match(&record.title()) || re.is_match(&record.url())
            }
        }
    }
}

/// Hostname of `url_text`, if it parses as an absolute URL with a host.
pub fn hostname(url_text: &str) -> Option<String> {
    Url::parse(url_text)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
}

// =============================================================================
// Pipeline entry points
// =============================================================================

/// Apply filters, returning indices of matching records in input order.
///
/// Indices let a caller that owns the records keep the view alongside them
/// without borrowing.
pub fn filter_indices(records: &[NormalizedRecord], filter: &FilterState) -> Vec<usize> {
    let compiled = filter.compile();
    if compiled.passes_everything() {
        return (0..records.len()).collect();
    }

    let indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| compiled.matches(record))
        .map(|(idx, _)| idx)
        .collect();

    tracing::debug!(
        total = records.len(),
        kept = indices.len(),
        "Filter pass complete"
    );
    indices
}

/// Apply filters, returning the surviving records in input order.
pub fn apply_filters<'a>(records: &'a [NormalizedRecord], filter: &FilterState) -> FilteredView<'a> {
    filter_indices(records, filter)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

// =============================================================================
// Grouping
// =============================================================================

/// Partition `view` by url hostname.
///
/// Buckets appear in the order their first member appears in the view, and
/// members keep their view order. Records without a parsable host share the
/// `"ungrouped"` bucket. Every record lands in exactly one bucket.
pub fn group_by_domain<'a>(view: &[&'a NormalizedRecord]) -> Vec<DomainGroup<'a>> {
    let mut groups: Vec<DomainGroup<'a>> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();

    for &record in view {
        let key = hostname(&record.url()).unwrap_or_else(|| constants::UNGROUPED_BUCKET.to_string());
        let slot = *slot_of.entry(key.clone()).or_insert_with(|| {
            groups.push(DomainGroup {
                key,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    groups
}

/// Bucket `view` as `group_by` asks. `GroupBy::None` yields one bucket with
/// an empty key holding the whole view (or no buckets for an empty view).
pub fn group_view<'a>(view: &[&'a NormalizedRecord], group_by: GroupBy) -> Vec<DomainGroup<'a>> {
    match group_by {
        GroupBy::Domain => group_by_domain(view),
        GroupBy::None if view.is_empty() => Vec::new(),
        GroupBy::None => vec![DomainGroup {
            key: String::new(),
            records: view.to_vec(),
        }],
    }
}
