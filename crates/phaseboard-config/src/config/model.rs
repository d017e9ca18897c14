use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use phaseboard_utils::types::ConfigSource;

/// Default location of the JSON record store, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".phaseboard/projects.json";

/// Default read-cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Upper bound for the read-cache TTL in seconds.
pub const MAX_CACHE_TTL_SECS: u64 = 600;

pub const DEFAULT_SHEET_NAME: &str = "Overzicht";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "portfolio.xlsx";
pub const DEFAULT_PROJECT_HEADER: &str = "Project";
pub const DEFAULT_HEADER_FILL: &str = "#1F4E78";
pub const DEFAULT_PROJECT_COLUMN_WIDTH: f64 = 32.0;
pub const DEFAULT_PHASE_COLUMN_WIDTH: f64 = 22.0;
pub const DEFAULT_PROGRESS_COLUMN_WIDTH: f64 = 12.0;

/// `[defaults]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Defaults {
    pub verbose: Option<bool>,
}

/// `[store]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path of the JSON record file
    pub path: Option<String>,
}

/// `[cache]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Read-cache TTL in seconds; 0 disables caching
    pub ttl_seconds: Option<u64>,
}

/// `[export]` section controlling the spreadsheet layout
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    pub sheet_name: Option<String>,
    pub file_name: Option<String>,
    /// Header label of the project column
    pub project_header: Option<String>,
    /// Header background as `#RRGGBB`
    pub header_fill: Option<String>,
    pub project_column_width: Option<f64>,
    pub phase_column_width: Option<f64>,
    pub progress_column_width: Option<f64>,
}

/// Configuration for phaseboard operations.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that:
/// - Respects the `PHASEBOARD_HOME` environment variable
/// - Searches for `.phaseboard/config.toml` upward from current directory
/// - Applies built-in defaults for unspecified values
///
/// # Source Attribution
///
/// Each configuration value tracks its source (`cli`, `config`, `programmatic`, or `default`)
/// for display by `phaseboard config`.
///
/// # Example
///
/// ```rust,no_run
/// use phaseboard_config::{CliArgs, Config};
///
/// let config = Config::discover(&CliArgs::default())?;
/// println!("Store: {}", config.store_path());
/// println!("Cache TTL: {:?}", config.cache_ttl());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub defaults: Defaults,
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub export: ExportConfig,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn store_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.store.path.as_deref().unwrap_or(DEFAULT_STORE_PATH))
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    #[must_use]
    pub fn sheet_name(&self) -> &str {
        self.export.sheet_name.as_deref().unwrap_or(DEFAULT_SHEET_NAME)
    }

    #[must_use]
    pub fn export_file_name(&self) -> &str {
        self.export
            .file_name
            .as_deref()
            .unwrap_or(DEFAULT_EXPORT_FILE_NAME)
    }

    #[must_use]
    pub fn project_header(&self) -> &str {
        self.export
            .project_header
            .as_deref()
            .unwrap_or(DEFAULT_PROJECT_HEADER)
    }

    #[must_use]
    pub fn header_fill(&self) -> &str {
        self.export
            .header_fill
            .as_deref()
            .unwrap_or(DEFAULT_HEADER_FILL)
    }

    /// Header fill as a packed `0xRRGGBB` value.
    ///
    /// Falls back to the default fill if the configured value does not parse;
    /// validation rejects such values before a `Config` is handed out.
    #[must_use]
    pub fn header_fill_rgb(&self) -> u32 {
        parse_hex_color(self.header_fill())
            .or_else(|| parse_hex_color(DEFAULT_HEADER_FILL))
            .unwrap_or(0x1F4E78)
    }

    #[must_use]
    pub fn project_column_width(&self) -> f64 {
        self.export
            .project_column_width
            .unwrap_or(DEFAULT_PROJECT_COLUMN_WIDTH)
    }

    #[must_use]
    pub fn phase_column_width(&self) -> f64 {
        self.export
            .phase_column_width
            .unwrap_or(DEFAULT_PHASE_COLUMN_WIDTH)
    }

    #[must_use]
    pub fn progress_column_width(&self) -> f64 {
        self.export
            .progress_column_width
            .unwrap_or(DEFAULT_PROGRESS_COLUMN_WIDTH)
    }
}

pub(crate) fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
