// CrawlScope - ui/listing.rs
//
// Plain-text listing of the filtered view for terminal output.
// Renders at most `cap` records; bucketed by hostname when the filter asks
// for domain grouping.

use crate::app::state::AppState;
use crate::core::filter::{self, GroupBy};
use crate::core::model::NormalizedRecord;
use std::io::{self, Write};

/// Characters of page text shown under each record.
const TEXT_PREVIEW_CHARS: usize = 160;

/// Render the status line, the capped listing, and a footer.
pub fn render<W: Write>(state: &AppState, cap: usize, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", state.status_message)?;

    let total = state.filtered_indices.len();
    if total == 0 {
        writeln!(out, "No items. Load a JSON/JSONL file or relax the filters.")?;
        return Ok(());
    }

    let shown = state.display_records(cap);
    match state.filter_state.group_by {
        GroupBy::None => {
            for record in &shown {
                render_record(record, out)?;
            }
        }
        GroupBy::Domain => {
            for group in filter::group_by_domain(&shown) {
                writeln!(out, "\n== {} ({}) ==", group.key, group.records.len())?;
                for record in group.records {
                    render_record(record, out)?;
                }
            }
        }
    }

    writeln!(
        out,
        "\nShowing {} of {} matching records ({} loaded).",
        shown.len(),
        total,
        state.records.len()
    )?;
    Ok(())
}

fn render_record<W: Write>(record: &NormalizedRecord, out: &mut W) -> io::Result<()> {
    let title = record.title();
    let url = record.url();
    let heading = if title.is_empty() { &url } else { &title };

    let fetched_at = record.fetched_at();
    let content_type = record.content_type();
    let meta: Vec<&str> = [&*fetched_at, &*content_type]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if meta.is_empty() {
        writeln!(out, "* {heading}")?;
    } else {
        writeln!(out, "* {heading}  [{}]", meta.join(" | "))?;
    }
    if !url.is_empty() && !title.is_empty() {
        writeln!(out, "    {url}")?;
    }

    let text = text_preview(&record.text());
    if !text.is_empty() {
        writeln!(out, "    {text}")?;
    }
    Ok(())
}

/// Collapse whitespace and clamp to `TEXT_PREVIEW_CHARS`.
fn text_preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= TEXT_PREVIEW_CHARS {
        return collapsed;
    }
    let mut clamped: String = collapsed.chars().take(TEXT_PREVIEW_CHARS).collect();
    clamped.push_str("...");
    clamped
}
