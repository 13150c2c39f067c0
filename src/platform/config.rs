// CrawlScope - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for CrawlScope configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/crawlscope/ or %APPDATA%\CrawlScope\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Location of config.toml inside the config directory.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[display]` section.
    pub display: DisplaySection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Number of filtered records listed.
    pub cap: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// File name used when an export target is a directory.
    pub file_name: Option<String>,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Treat search queries as regexes unless told otherwise.
    pub regex_mode: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub display_cap: usize,
    pub export_file_name: String,
    pub regex_mode: bool,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display_cap: constants::DISPLAY_CAP,
            export_file_name: constants::DEFAULT_EXPORT_FILE_NAME.to_string(),
            regex_mode: false,
            log_level: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and every problem found. A
/// missing file is not a problem (first run). An unreadable or unparsable
/// file yields defaults plus one error; out-of-range values each yield an
/// error and keep their default.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Display: cap --
    if let Some(cap) = raw.display.cap {
        if (constants::MIN_DISPLAY_CAP..=constants::MAX_DISPLAY_CAP).contains(&cap) {
            config.display_cap = cap;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[display] cap".to_string(),
                value: cap.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_DISPLAY_CAP,
                    constants::MAX_DISPLAY_CAP
                ),
            });
        }
    }

    // -- Export: file_name --
    if let Some(name) = raw.export.file_name {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.contains(&['/', '\\'][..]) {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[export] file_name".to_string(),
                value: name.clone(),
                expected: "a bare, non-empty file name".to_string(),
            });
        } else {
            config.export_file_name = trimmed.to_string();
        }
    }

    // -- Filter: regex_mode --
    if let Some(regex_mode) = raw.filter.regex_mode {
        config.regex_mode = regex_mode;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug, trace".to_string(),
            });
        }
    }

    (config, warnings)
}
