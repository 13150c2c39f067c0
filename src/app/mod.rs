// CrawlScope - app/mod.rs
//
// Application layer: session state and orchestration of load, filter and
// export.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod state;
