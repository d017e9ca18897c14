//! Command-line interface for phaseboard
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: entry point, config discovery and command dispatch
//! - `commands`: command implementations
//! - `tests`: argument parsing tests (cfg(test) only)

pub mod args;
mod commands;
mod run;

#[cfg(test)]
mod tests;

pub use args::{Cli, Commands};
pub use run::run;
