//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Installs the tracing subscriber
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;

use phaseboard_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;
use crate::{CliArgs, Config, ExitCode, JsonFileStore, PhaseboardError, Portfolio};

/// Main CLI execution function.
///
/// This function handles ALL output including errors. On error it prints a
/// user-facing report and returns the matching exit code; main.rs only calls
/// `std::process::exit()` with it.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        store_path: cli.store.clone(),
        cache_ttl_seconds: cli.cache_ttl,
        sheet_name: cli.sheet_name.clone(),
        verbose: Some(cli.verbose),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            report_error(&err, "config");
            return Err(err.to_exit_code());
        }
    };

    if let Err(e) = init_tracing(config.verbose()) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }
    tracing::debug!(store = %config.store_path(), "Configuration loaded");

    let operation = cli.command.name();
    let result = dispatch(cli.command, &config);

    if let Err(error) = result {
        if let Some(phaseboard_error) = error.downcast_ref::<PhaseboardError>() {
            report_error(phaseboard_error, operation);
            return Err(phaseboard_error.to_exit_code());
        }
        eprintln!("✗ Unexpected error during {operation}: {error:#}");
        eprintln!("\n  Run with --verbose for more detailed output");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}

fn dispatch(command: Commands, config: &Config) -> anyhow::Result<()> {
    // Opening the store does not touch the file; the first read does.
    let store = JsonFileStore::new(config.store_path());
    let mut portfolio = Portfolio::from_config(store, config);

    let result = match command {
        Commands::Summary { json } => commands::execute_summary_command(&mut portfolio, json),
        Commands::Matrix { project, json } => {
            commands::execute_matrix_command(&mut portfolio, project.as_deref(), json)
        }
        Commands::Show { project, json } => {
            commands::execute_show_command(&mut portfolio, &project, json)
        }
        Commands::Export { out } => {
            let out = out.unwrap_or_else(|| config.export_file_name().to_string());
            commands::execute_export_command(&mut portfolio, &out)
        }
        Commands::Create { name, statuses } => {
            commands::execute_create_command(&mut portfolio, &name, &statuses)
        }
        Commands::Set {
            project,
            phase,
            status,
        } => commands::execute_set_command(&mut portfolio, &project, &phase, &status),
        Commands::Rename { from, to } => {
            commands::execute_rename_command(&mut portfolio, &from, &to)
        }
        Commands::Delete { name } => commands::execute_delete_command(&mut portfolio, &name),
        Commands::Projects { json } => commands::execute_projects_command(&mut portfolio, json),
        Commands::Config { json } => commands::execute_config_command(config, json),
    };

    portfolio.log_cache_stats();
    result
}

fn report_error(error: &PhaseboardError, operation: &str) {
    eprintln!("{}", error.display_for_user());
    eprintln!("\n  Operation: {operation}");
}
