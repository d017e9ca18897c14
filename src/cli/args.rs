//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// phaseboard - project phase progress tracking
#[derive(Parser, Debug)]
#[command(name = "phaseboard")]
#[command(about = "Track project progress per delivery phase and export portfolio reports")]
#[command(long_about = r#"
phaseboard records one status per delivery phase for each project and reports
portfolio progress as summaries, a project×phase matrix, or an .xlsx export.

EXAMPLES:
  # Create a project with two phases already underway
  phaseboard create Acme --status "Inventarisatie=Voltooid" --status "Configuratie=Bezig"

  # Update one phase
  phaseboard set Acme Training Start

  # Show per-project progress
  phaseboard summary

  # Show the status matrix of one project as JSON
  phaseboard matrix --project Acme --json

  # Write the spreadsheet report
  phaseboard export --out portfolio.xlsx

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .phaseboard/config.toml
  Use --config to specify an explicit config file path

PHASES:
  Inventarisatie → Configuratie → Acceptatietest (UAT) → Training → Go-Live

STATUSES:
  Nog niet gestart (0) < Start (10) < Bezig (50) < Voltooid (100)
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path of the JSON record file
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Read-cache TTL in seconds (0 disables, max 600)
    #[arg(long, global = true)]
    pub cache_ttl: Option<u64>,

    /// Worksheet name used by export
    #[arg(long, global = true)]
    pub sheet_name: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the average progress of every project
    Summary {
        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the project×phase status matrix
    Matrix {
        /// Restrict the matrix to one project
        #[arg(long)]
        project: Option<String>,

        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one project's phases and status distribution
    Show {
        /// Project name
        project: String,

        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the portfolio as an .xlsx spreadsheet
    Export {
        /// Output file (defaults to the configured export file name)
        #[arg(long, short)]
        out: Option<String>,
    },

    /// Create a project with one record per phase
    Create {
        /// Project name
        name: String,

        /// Initial status as PHASE=STATUS (repeatable)
        #[arg(long = "status", value_name = "PHASE=STATUS")]
        statuses: Vec<String>,
    },

    /// Set the status of one phase
    Set {
        project: String,
        phase: String,
        status: String,
    },

    /// Rename a project
    Rename { from: String, to: String },

    /// Delete a project and all its records
    Delete { name: String },

    /// List project names
    Projects {
        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and where each value came from
    Config {
        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation name used in error reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary { .. } => "summary",
            Self::Matrix { .. } => "matrix",
            Self::Show { .. } => "show",
            Self::Export { .. } => "export",
            Self::Create { .. } => "create",
            Self::Set { .. } => "set",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
            Self::Projects { .. } => "projects",
            Self::Config { .. } => "config",
        }
    }
}
