use phaseboard_utils::error::PhaseboardError;

use super::{Config, ConfigSource};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding phaseboard without relying on environment
    /// variables or config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phaseboard_config::Config;
    ///
    /// let config = Config::builder()
    ///     .store_path("/srv/phaseboard/projects.json")
    ///     .cache_ttl_seconds(120)
    ///     .sheet_name("Portfolio")
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.sheet_name(), "Portfolio");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration of phaseboard.
///
/// All values set via the builder are attributed to
/// `ConfigSource::Programmatic` in the resulting `Config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    verbose: Option<bool>,
    store_path: Option<String>,
    cache_ttl_seconds: Option<u64>,
    sheet_name: Option<String>,
    export_file_name: Option<String>,
    project_header: Option<String>,
    header_fill: Option<String>,
    project_column_width: Option<f64>,
    phase_column_width: Option<f64>,
    progress_column_width: Option<f64>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn store_path(mut self, path: impl Into<String>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Read-cache TTL in seconds. `0` disables caching.
    #[must_use]
    pub fn cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn project_header(mut self, header: impl Into<String>) -> Self {
        self.project_header = Some(header.into());
        self
    }

    /// Header background colour as `#RRGGBB`.
    #[must_use]
    pub fn header_fill(mut self, fill: impl Into<String>) -> Self {
        self.header_fill = Some(fill.into());
        self
    }

    #[must_use]
    pub fn column_widths(mut self, project: f64, phase: f64, progress: f64) -> Self {
        self.project_column_width = Some(project);
        self.phase_column_width = Some(phase);
        self.progress_column_width = Some(progress);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Config, PhaseboardError> {
        let mut config = Config::default();
        for key in Config::attributed_keys() {
            config
                .source_attribution
                .insert((*key).to_string(), ConfigSource::Default);
        }

        let mut set = |key: &str, present: bool| {
            if present {
                config
                    .source_attribution
                    .insert(key.to_string(), ConfigSource::Programmatic);
            }
        };
        set("verbose", self.verbose.is_some());
        set("store_path", self.store_path.is_some());
        set("cache_ttl_seconds", self.cache_ttl_seconds.is_some());
        set("sheet_name", self.sheet_name.is_some());
        set("export_file_name", self.export_file_name.is_some());
        set("project_header", self.project_header.is_some());
        set("header_fill", self.header_fill.is_some());
        set("project_column_width", self.project_column_width.is_some());
        set("phase_column_width", self.phase_column_width.is_some());
        set("progress_column_width", self.progress_column_width.is_some());

        config.defaults.verbose = self.verbose;
        config.store.path = self.store_path;
        config.cache.ttl_seconds = self.cache_ttl_seconds;
        config.export.sheet_name = self.sheet_name;
        config.export.file_name = self.export_file_name;
        config.export.project_header = self.project_header;
        config.export.header_fill = self.header_fill;
        config.export.project_column_width = self.project_column_width;
        config.export.phase_column_width = self.phase_column_width;
        config.export.progress_column_width = self.progress_column_width;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attributes_programmatic_values() {
        let config = Config::builder()
            .cache_ttl_seconds(0)
            .project_header("Klant")
            .build()
            .unwrap();

        assert_eq!(config.cache_ttl().as_secs(), 0);
        assert_eq!(config.project_header(), "Klant");
        assert_eq!(
            config.source_attribution.get("cache_ttl_seconds"),
            Some(&ConfigSource::Programmatic)
        );
        assert_eq!(
            config.source_attribution.get("sheet_name"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    fn test_builder_validates() {
        assert!(Config::builder().header_fill("blue").build().is_err());
        assert!(
            Config::builder()
                .column_widths(40.0, 20.0, 10.0)
                .build()
                .is_ok()
        );
    }
}
