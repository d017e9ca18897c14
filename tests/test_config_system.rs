//! Configuration system tests
//!
//! Discovery, precedence and validation through the public `Config` API.
//! All tests use `discover_from` with temp directories to stay clear of the
//! process working directory and environment.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use phaseboard::{CliArgs, Config, ConfigError, ConfigSource, ExportOptions, PhaseboardError};

fn isolated_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

fn write_config(root: &Path, content: &str) {
    let dir = root.join(".phaseboard");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_built_in_defaults() {
    let temp = isolated_repo();
    let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();

    assert_eq!(config.store_path().as_str(), ".phaseboard/projects.json");
    assert_eq!(config.cache_ttl().as_secs(), 300);
    assert_eq!(config.sheet_name(), "Overzicht");
    assert_eq!(ExportOptions::from_config(&config), ExportOptions::default());
}

#[test]
fn test_precedence_cli_over_file_over_default() {
    let temp = isolated_repo();
    write_config(
        temp.path(),
        r#"
[store]
path = "shared/projects.json"

[export]
sheet_name = "Portfolio"
project_header = "Klant"
"#,
    );
    let args = CliArgs {
        sheet_name: Some("Q4".to_string()),
        ..CliArgs::default()
    };

    let config = Config::discover_from(temp.path(), &args).unwrap();
    assert_eq!(config.sheet_name(), "Q4");
    assert_eq!(config.project_header(), "Klant");
    assert_eq!(config.store_path().as_str(), "shared/projects.json");

    let sources = &config.source_attribution;
    assert_eq!(sources.get("sheet_name"), Some(&ConfigSource::Cli));
    assert_eq!(sources.get("project_header"), Some(&ConfigSource::Config));
    assert_eq!(sources.get("cache_ttl_seconds"), Some(&ConfigSource::Default));
}

#[test]
fn test_effective_config_lists_every_key() {
    let temp = isolated_repo();
    write_config(temp.path(), "[cache]\nttl_seconds = 0\n");

    let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();
    let effective = config.effective_config();
    assert_eq!(
        effective.get("cache_ttl_seconds"),
        Some(&("0".to_string(), "config".to_string()))
    );
    assert!(effective.contains_key("header_fill"));
    assert!(effective.contains_key("store_path"));
}

#[test]
fn test_invalid_values_map_to_config_exit_code() {
    for content in [
        "[cache]\nttl_seconds = 601\n",
        "[export]\nsheet_name = \"a:b\"\n",
        "[export]\nheader_fill = \"red\"\n",
        "[export]\nprogress_column_width = 50\n",
    ] {
        let temp = isolated_repo();
        write_config(temp.path(), content);
        let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();
        assert!(
            matches!(err, PhaseboardError::Config(ConfigError::InvalidValue { .. })),
            "{content}: {err:?}"
        );
        assert_eq!(err.to_exit_code().as_i32(), 2);
    }
}

#[test]
fn test_malformed_toml_is_rejected() {
    let temp = isolated_repo();
    write_config(temp.path(), "[cache\nttl_seconds = 1\n");
    assert!(matches!(
        Config::discover_from(temp.path(), &CliArgs::default()),
        Err(PhaseboardError::Config(ConfigError::InvalidFile(_)))
    ));
}
