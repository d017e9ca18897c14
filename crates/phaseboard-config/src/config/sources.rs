use std::collections::BTreeMap;

use super::{Config, ConfigSource};

impl Config {
    fn source_label(&self, key: &str) -> String {
        self.source_attribution
            .get(key)
            .unwrap_or(&ConfigSource::Default)
            .as_str()
            .to_string()
    }

    /// Effective configuration as `key -> (value, source)` pairs, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let entries = [
            ("verbose", self.verbose().to_string()),
            ("store_path", self.store_path().to_string()),
            ("cache_ttl_seconds", self.cache_ttl().as_secs().to_string()),
            ("sheet_name", self.sheet_name().to_string()),
            ("export_file_name", self.export_file_name().to_string()),
            ("project_header", self.project_header().to_string()),
            ("header_fill", self.header_fill().to_string()),
            ("project_column_width", self.project_column_width().to_string()),
            ("phase_column_width", self.phase_column_width().to_string()),
            ("progress_column_width", self.progress_column_width().to_string()),
        ];

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), (value, self.source_label(key))))
            .collect()
    }
}
