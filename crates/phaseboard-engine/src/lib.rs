//! Progress aggregation engine for phaseboard.
//!
//! - [`score`]: status to score mapping and averaging
//! - [`matrix`]: per-project summaries and the project×phase matrix
//! - [`export`]: `.xlsx` rendering of the matrix with a `Progress %` column
//! - [`dashboard`]: overview and single-project read models
//! - [`store`]: record store contract with in-memory and JSON file backends
//! - [`portfolio`]: cached reads and validated writes over a store

pub mod dashboard;
pub mod export;
pub mod matrix;
pub mod portfolio;
pub mod score;
pub mod store;

pub use dashboard::{PhaseProgress, PortfolioOverview, ProjectDetail, StatusCount};
pub use export::{ExportOptions, PROGRESS_HEADER, ReportExporter, render};
pub use matrix::{MatrixBuilder, MatrixRow, ProjectMatrix};
pub use portfolio::{Portfolio, parse_assignment};
pub use score::score_of;
pub use store::{InMemoryStore, JsonFileStore, ProgressRecordStore};
