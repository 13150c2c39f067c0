// CrawlScope - ui/mod.rs
//
// Presentation layer: terminal rendering of the filtered view.
// Dependencies: app, core.

pub mod listing;
