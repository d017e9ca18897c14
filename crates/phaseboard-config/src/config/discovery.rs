use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use phaseboard_utils::error::{ConfigError, PhaseboardError};

use super::{CacheConfig, CliArgs, Config, ConfigSource, Defaults, ExportConfig, StoreConfig};

/// Environment variable naming a directory that holds `config.toml`.
pub const HOME_ENV_VAR: &str = "PHASEBOARD_HOME";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<Defaults>,
    store: Option<StoreConfig>,
    cache: Option<CacheConfig>,
    export: Option<ExportConfig>,
}

/// Override `$target` with `$value` when it is set, recording `$source`.
macro_rules! apply {
    ($attribution:expr, $source:expr, $key:literal, $target:expr, $value:expr) => {
        if let Some(value) = $value {
            $target = Some(value);
            $attribution.insert($key.to_string(), $source.clone());
        }
    };
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Looks for `$PHASEBOARD_HOME/config.toml` first, then searches upward
    /// from the current directory.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, PhaseboardError> {
        if cli_args.config_path.is_none()
            && let Some(home) = env::var_os(HOME_ENV_VAR)
        {
            let candidate = PathBuf::from(home).join("config.toml");
            if candidate.is_file() {
                let args = CliArgs {
                    config_path: Some(candidate),
                    ..cli_args.clone()
                };
                return Self::discover_from(Path::new("."), &args);
            }
        }

        let start_dir = env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("failed to get current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global
    /// state. An explicit `config_path` in `cli_args` skips the search.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, PhaseboardError> {
        let mut config = Config::default();
        for key in Self::attributed_keys() {
            config
                .source_attribution
                .insert((*key).to_string(), ConfigSource::Default);
        }

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    }
                    .into());
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)?;
            config.apply_file(file_config);
        }

        config.apply_cli(cli_args);
        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.phaseboard/config.toml`.
    ///
    /// The search stops at the filesystem root or at the first repository
    /// root marker (`.git`, `.hg`, `.svn`).
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(".phaseboard").join("config.toml");
            if config_path.is_file() {
                return Some(config_path);
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                return None;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    /// Keys tracked in the source attribution map.
    pub(crate) fn attributed_keys() -> &'static [&'static str] {
        &[
            "verbose",
            "store_path",
            "cache_ttl_seconds",
            "sheet_name",
            "export_file_name",
            "project_header",
            "header_fill",
            "project_column_width",
            "phase_column_width",
            "progress_column_width",
        ]
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, PhaseboardError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile(
            format!("failed to read {}: {e}", path.display()),
        ))?;
        toml::from_str(&content).map_err(|e| {
            ConfigError::InvalidFile(format!("failed to parse {}: {e}", path.display())).into()
        })
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let source = ConfigSource::Config;
        let attribution = &mut self.source_attribution;

        if let Some(defaults) = file.defaults {
            apply!(attribution, source, "verbose", self.defaults.verbose, defaults.verbose);
        }
        if let Some(store) = file.store {
            apply!(attribution, source, "store_path", self.store.path, store.path);
        }
        if let Some(cache) = file.cache {
            apply!(
                attribution,
                source,
                "cache_ttl_seconds",
                self.cache.ttl_seconds,
                cache.ttl_seconds
            );
        }
        if let Some(export) = file.export {
            apply!(attribution, source, "sheet_name", self.export.sheet_name, export.sheet_name);
            apply!(
                attribution,
                source,
                "export_file_name",
                self.export.file_name,
                export.file_name
            );
            apply!(
                attribution,
                source,
                "project_header",
                self.export.project_header,
                export.project_header
            );
            apply!(
                attribution,
                source,
                "header_fill",
                self.export.header_fill,
                export.header_fill
            );
            apply!(
                attribution,
                source,
                "project_column_width",
                self.export.project_column_width,
                export.project_column_width
            );
            apply!(
                attribution,
                source,
                "phase_column_width",
                self.export.phase_column_width,
                export.phase_column_width
            );
            apply!(
                attribution,
                source,
                "progress_column_width",
                self.export.progress_column_width,
                export.progress_column_width
            );
        }
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        let source = ConfigSource::Cli;
        let attribution: &mut HashMap<String, ConfigSource> = &mut self.source_attribution;

        // A bare `--verbose` flag only ever turns verbosity on.
        if cli_args.verbose == Some(true) {
            self.defaults.verbose = Some(true);
            attribution.insert("verbose".to_string(), source.clone());
        }
        apply!(attribution, source, "store_path", self.store.path, cli_args.store_path.clone());
        apply!(
            attribution,
            source,
            "cache_ttl_seconds",
            self.cache.ttl_seconds,
            cli_args.cache_ttl_seconds
        );
        apply!(
            attribution,
            source,
            "sheet_name",
            self.export.sheet_name,
            cli_args.sheet_name.clone()
        );
    }
}
