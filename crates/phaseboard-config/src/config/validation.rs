use regex::Regex;
use std::sync::LazyLock;

use phaseboard_utils::error::{ConfigError, PhaseboardError};

use super::{Config, MAX_CACHE_TTL_SECS, parse_hex_color};

/// Characters Excel forbids in worksheet names.
static SHEET_NAME_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]:*?/\\]").expect("static regex"));

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex"));

/// Excel's maximum column width in character units.
const MAX_COLUMN_WIDTH: f64 = 255.0;

fn invalid(key: &str, value: impl Into<String>) -> PhaseboardError {
    PhaseboardError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    })
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), PhaseboardError> {
        if let Some(ttl) = self.cache.ttl_seconds
            && ttl > MAX_CACHE_TTL_SECS
        {
            return Err(invalid(
                "cache_ttl_seconds",
                format!("exceeds maximum of {MAX_CACHE_TTL_SECS} seconds"),
            ));
        }

        if let Some(path) = &self.store.path
            && path.trim().is_empty()
        {
            return Err(invalid("store_path", "must not be empty"));
        }

        let sheet_name = self.sheet_name();
        let sheet_len = sheet_name.chars().count();
        if sheet_len == 0 || sheet_len > 31 {
            return Err(invalid("sheet_name", "must be 1 to 31 characters"));
        }
        if SHEET_NAME_FORBIDDEN.is_match(sheet_name) {
            return Err(invalid(
                "sheet_name",
                "must not contain any of [ ] : * ? / \\",
            ));
        }
        if sheet_name.starts_with('\'') || sheet_name.ends_with('\'') {
            return Err(invalid("sheet_name", "must not start or end with an apostrophe"));
        }

        if self.export_file_name().trim().is_empty() {
            return Err(invalid("export_file_name", "must not be empty"));
        }

        if !HEX_COLOR.is_match(self.header_fill()) || parse_hex_color(self.header_fill()).is_none()
        {
            return Err(invalid(
                "header_fill",
                format!("'{}' is not a #RRGGBB colour", self.header_fill()),
            ));
        }

        for (key, width) in [
            ("project_column_width", self.project_column_width()),
            ("phase_column_width", self.phase_column_width()),
            ("progress_column_width", self.progress_column_width()),
        ] {
            if !(width > 0.0 && width <= MAX_COLUMN_WIDTH) {
                return Err(invalid(key, format!("must be in (0, {MAX_COLUMN_WIDTH}]")));
            }
        }

        if self.project_column_width() <= self.phase_column_width() {
            return Err(invalid(
                "project_column_width",
                "must be wider than phase_column_width",
            ));
        }
        if self.progress_column_width() >= self.phase_column_width() {
            return Err(invalid(
                "progress_column_width",
                "must be narrower than phase_column_width",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: &Config, expected_key: &str) {
        match config.validate() {
            Err(PhaseboardError::Config(ConfigError::InvalidValue { key, .. })) => {
                assert_eq!(key, expected_key);
            }
            other => panic!("expected invalid {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_cache_ttl_upper_bound() {
        let mut config = Config::default();
        config.cache.ttl_seconds = Some(600);
        assert!(config.validate().is_ok());
        config.cache.ttl_seconds = Some(601);
        assert_invalid(&config, "cache_ttl_seconds");
    }

    #[test]
    fn test_sheet_name_rules() {
        let mut config = Config::default();
        config.export.sheet_name = Some("Q3/Q4".to_string());
        assert_invalid(&config, "sheet_name");

        config.export.sheet_name = Some(String::new());
        assert_invalid(&config, "sheet_name");

        config.export.sheet_name = Some("x".repeat(32));
        assert_invalid(&config, "sheet_name");

        config.export.sheet_name = Some("Portfolio 2026".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_header_fill_must_be_hex() {
        let mut config = Config::default();
        config.export.header_fill = Some("navy".to_string());
        assert_invalid(&config, "header_fill");
    }

    #[test]
    fn test_column_width_ordering() {
        let mut config = Config::default();
        config.export.project_column_width = Some(10.0);
        assert_invalid(&config, "project_column_width");

        let mut config = Config::default();
        config.export.progress_column_width = Some(40.0);
        assert_invalid(&config, "progress_column_width");

        let mut config = Config::default();
        config.export.phase_column_width = Some(0.0);
        assert_invalid(&config, "phase_column_width");
    }
}
