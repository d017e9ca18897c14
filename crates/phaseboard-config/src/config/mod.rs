//! Configuration management for phaseboard
//!
//! This module provides hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. Supports TOML configuration files with `[defaults]`,
//! `[store]`, `[cache]` and `[export]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::HOME_ENV_VAR;
pub use model::*;
pub use phaseboard_utils::types::ConfigSource;
