//! Read models behind the portfolio overview and the per-project view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use phaseboard_utils::error::{EmptyInputWarning, PhaseboardError, StoreError};
use phaseboard_utils::logging::{engine_span, log_empty_input};
use phaseboard_utils::types::{ProgressRecord, ProjectSummary, Status};

use crate::matrix::{MatrixBuilder, ProjectMatrix, order_phase_columns};
use crate::score::{rounded_mean, score_of, truncated_mean};

/// Label and colour of the distribution bucket for statuses outside the catalog.
pub const OTHER_STATUS_LABEL: &str = "other";
pub const OTHER_STATUS_COLOR: &str = "grey";

/// Portfolio-wide figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioOverview {
    pub project_count: usize,
    pub record_count: usize,
    /// Mean score over every record, truncated toward zero.
    pub overall_progress: u8,
    /// Per-project averages sorted by project name.
    pub projects: Vec<ProjectSummary>,
    pub generated_at: DateTime<Utc>,
}

/// One phase of a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    pub phase: String,
    pub status: String,
    pub score: u8,
}

/// Number of phases in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub color: &'static str,
    pub count: usize,
}

/// Everything the single-project view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    pub project: String,
    pub average_score: u8,
    /// Catalog phases in catalog order, then unknown phases.
    pub phases: Vec<PhaseProgress>,
    pub status_distribution: Vec<StatusCount>,
    pub matrix: ProjectMatrix,
}

/// Summarize the whole portfolio.
#[must_use]
pub fn build_overview(records: &[ProgressRecord]) -> PortfolioOverview {
    let _span = engine_span("overview", records.len()).entered();
    if records.is_empty() {
        log_empty_input(EmptyInputWarning {
            operation: "overview",
        });
    }

    let projects = MatrixBuilder::summarize(records);
    let scores: Vec<u8> = records.iter().map(|r| score_of(&r.status)).collect();

    PortfolioOverview {
        project_count: projects.len(),
        record_count: records.len(),
        overall_progress: truncated_mean(&scores).unwrap_or(0),
        projects,
        generated_at: Utc::now(),
    }
}

/// Build the detail view of `project` from the full record set.
///
/// # Errors
///
/// [`StoreError::ProjectNotFound`] when no record belongs to `project`, and
/// [`PhaseboardError::DuplicateKey`] when the project's records conflict.
pub fn build_project_detail(
    project: &str,
    records: &[ProgressRecord],
) -> Result<ProjectDetail, PhaseboardError> {
    let _span = engine_span("project_detail", records.len()).entered();

    let own: Vec<&ProgressRecord> = records.iter().filter(|r| r.project == project).collect();
    if own.is_empty() {
        return Err(StoreError::ProjectNotFound {
            project: project.to_string(),
        }
        .into());
    }

    let matrix = MatrixBuilder::to_matrix(records, Some(project))?;

    // The matrix check above guarantees one record per phase.
    let phases: Vec<PhaseProgress> = order_phase_columns(own.iter().map(|r| r.phase.as_str()))
        .into_iter()
        .filter_map(|phase| own.iter().find(|r| r.phase == phase))
        .map(|r| PhaseProgress {
            phase: r.phase.clone(),
            status: r.status.clone(),
            score: score_of(&r.status),
        })
        .collect();

    let scores: Vec<u8> = phases.iter().map(|p| p.score).collect();

    Ok(ProjectDetail {
        project: project.to_string(),
        average_score: rounded_mean(&scores).unwrap_or(0),
        status_distribution: status_distribution(&own),
        phases,
        matrix,
    })
}

/// Count statuses from most to least advanced; unknown labels go to `other`.
fn status_distribution(records: &[&ProgressRecord]) -> Vec<StatusCount> {
    let mut buckets: Vec<StatusCount> = Status::ALL
        .iter()
        .rev()
        .map(|status| StatusCount {
            status: status.as_str().to_string(),
            color: status.color(),
            count: records.iter().filter(|r| r.status_id() == Some(*status)).count(),
        })
        .collect();

    let other = records.iter().filter(|r| r.status_id().is_none()).count();
    if other > 0 {
        buckets.push(StatusCount {
            status: OTHER_STATUS_LABEL.to_string(),
            color: OTHER_STATUS_COLOR,
            count: other,
        });
    }
    buckets
}
