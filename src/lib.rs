//! phaseboard - project phase progress tracking
//!
//! phaseboard keeps one status per delivery phase for each client project,
//! turns those statuses into progress scores, and reports the portfolio as a
//! project×phase matrix or as an `.xlsx` export.
//!
//! phaseboard can be used in two ways:
//! - **CLI**: run the `phaseboard` binary against a JSON record file
//! - **Library**: embed the engine and plug in your own record store
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Create a project; unspecified phases start as "Nog niet gestart"
//! phaseboard create Acme --status "Inventarisatie=Voltooid"
//!
//! # Update one phase
//! phaseboard set Acme Configuratie Bezig
//!
//! # Portfolio summary and matrix
//! phaseboard summary --json
//! phaseboard matrix --project Acme
//!
//! # Spreadsheet export
//! phaseboard export --out portfolio.xlsx
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use std::time::Duration;
//! use phaseboard::{InMemoryStore, Portfolio, ProgressRecord};
//!
//! let store = InMemoryStore::from_records(vec![
//!     ProgressRecord::new("Acme", "Inventarisatie", "Voltooid"),
//!     ProgressRecord::new("Acme", "Configuratie", "Bezig"),
//! ]);
//! let mut portfolio = Portfolio::new(store, Duration::from_secs(60));
//!
//! let summaries = portfolio.summaries()?;
//! assert_eq!(summaries[0].average_score, 75);
//!
//! let workbook = portfolio.export()?;
//! assert!(!workbook.is_empty());
//! # Ok::<(), phaseboard::PhaseboardError>(())
//! ```
//!
//! # Stable API
//!
//! The re-exports below form the public API. Everything under [`cli`] is
//! internal to the binary.

pub mod cli;

pub use phaseboard_config::{CliArgs, Config, ConfigBuilder, ConfigSource};
pub use phaseboard_engine::{
    ExportOptions, InMemoryStore, JsonFileStore, MatrixBuilder, MatrixRow, PhaseProgress,
    Portfolio, PortfolioOverview, ProgressRecordStore, ProjectDetail, ProjectMatrix,
    ReportExporter, StatusCount, parse_assignment, render, score_of,
};
pub use phaseboard_utils::canonicalization::emit_jcs;
pub use phaseboard_utils::error::{
    ConfigError, DuplicateKeyError, PhaseboardError, StoreError, UserFriendlyError,
    ValidationError,
};
pub use phaseboard_utils::exit_codes::ExitCode;
pub use phaseboard_utils::types::{Phase, ProgressRecord, ProjectSummary, Status};
