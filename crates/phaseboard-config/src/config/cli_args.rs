use std::path::PathBuf;

/// CLI-provided overrides fed into configuration discovery.
///
/// `None` means "not given on the command line"; the config file or the
/// built-in default applies instead.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path (skips discovery)
    pub config_path: Option<PathBuf>,
    pub store_path: Option<String>,
    pub cache_ttl_seconds: Option<u64>,
    pub sheet_name: Option<String>,
    pub verbose: Option<bool>,
}
