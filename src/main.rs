// CrawlScope - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Loading the dump, applying filters
// 4. Listing to stdout or exporting to CSV / JSON

use clap::Parser;
use crawlscope::app::state::AppState;
use crawlscope::core::filter::{FilterState, GroupBy};
use crawlscope::platform::{config, fs};
use crawlscope::ui::listing;
use crawlscope::util::{self, error};
use std::io::Write;
use std::path::PathBuf;

/// CrawlScope - load, filter and export crawled-page records.
///
/// Reads a crawl dump (a JSON array, a single JSON object, or one JSON
/// record per line), filters it by hostname and text, and either lists the
/// matches or exports them.
#[derive(Parser, Debug)]
#[command(name = "crawlscope", version, about)]
struct Cli {
    /// Crawl dump to load.
    path: PathBuf,

    /// Search text (case-insensitive) across text, title and url.
    #[arg(short = 'q', long = "query", default_value = "")]
    query: String,

    /// Keep only records whose url hostname contains this (case-sensitive).
    #[arg(short = 'D', long = "domain", default_value = "")]
    domain: String,

    /// Treat the query as a case-insensitive regular expression.
    #[arg(short = 'r', long = "regex", overrides_with = "no_regex")]
    regex: bool,

    /// Treat the query as plain text, even if config.toml enables regex mode.
    #[arg(long = "no-regex", overrides_with = "regex")]
    no_regex: bool,

    /// Bucket the listing: "none" or "domain".
    #[arg(short = 'g', long = "group-by", default_value = "none")]
    group_by: GroupBy,

    /// Write the filtered records as CSV to this file (or directory).
    #[arg(short = 'o', long = "export")]
    export: Option<PathBuf>,

    /// Write the filtered records as a JSON array to this file.
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Maximum records listed (export is never capped).
    #[arg(short = 'l', long = "limit")]
    limit: Option<usize>,

    /// Use this config file instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    /// Regex mode after CLI flags override the config default. The last of
    /// `--regex` / `--no-regex` given wins.
    fn regex_mode(&self, config_default: bool) -> bool {
        if self.regex {
            true
        } else if self.no_regex {
            false
        } else {
            config_default
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config::PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "CrawlScope starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Config warning");
    }

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &config::AppConfig) -> error::Result<()> {
    let mut state = AppState::new();
    state.load_file(&cli.path)?;

    let filter_state = FilterState {
        query: cli.query.clone(),
        domain_substring: cli.domain.clone(),
        regex_mode: cli.regex_mode(app_config.regex_mode),
        group_by: cli.group_by,
    };
    if let Err(e) = filter_state.validate_regex() {
        // Filtering proceeds without the text stage; say why.
        tracing::warn!(error = %e, "Search regex ignored");
        eprintln!("Warning: {e}; showing results without text search.");
    }
    state.set_filter(filter_state);

    let mut exported = false;

    if let Some(target) = &cli.export {
        let path = fs::resolve_export_path(target, &app_config.export_file_name);
        let count = state.export_csv_to(&path)?;
        report_export(count, &path);
        exported = true;
    }

    if let Some(path) = &cli.json {
        let count = state.export_json_to(path)?;
        report_export(count, path);
        exported = true;
    }

    if !exported {
        let cap = cli.limit.unwrap_or(app_config.display_cap);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        listing::render(&state, cap, &mut out)
            .and_then(|_| out.flush())
            .map_err(|e| error::CrawlScopeError::Io {
                path: PathBuf::from("<stdout>"),
                operation: "listing",
                source: e,
            })?;
    }

    Ok(())
}

fn report_export(count: usize, path: &std::path::Path) {
    if count == 0 {
        println!("Nothing to export: no records match the current filters.");
    } else {
        println!("Exported {count} records to {}", path.display());
    }
}
