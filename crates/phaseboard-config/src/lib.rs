//! Configuration model, discovery, and validation for phaseboard.

pub mod config;

pub use config::{CliArgs, Config, ConfigBuilder, ConfigSource};
