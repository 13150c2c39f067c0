// CrawlScope - core/mod.rs
//
// Core business logic layer: ingestion, normalisation, filtering, export.
// Must NOT depend on: platform, app, or touch the filesystem directly.

pub mod export;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod parser;
