//! Per-project aggregation and the project×phase status matrix.
//!
//! Both the dashboard and the spreadsheet export go through this module, so
//! the pivot, the duplicate check and the column ordering policy exist once.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use phaseboard_utils::error::{DuplicateKeyError, EmptyInputWarning};
use phaseboard_utils::logging::{engine_span, log_duplicate_key, log_empty_input};
use phaseboard_utils::types::{Phase, ProgressRecord, ProjectSummary};

use crate::score::{rounded_mean, score_of};

/// One matrix row: a project and one cell per matrix column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub project: String,
    /// Status per column, `None` where the project has no record.
    pub cells: Vec<Option<String>>,
}

/// Project×phase table of status labels.
///
/// Rows are sorted by project name. Columns hold catalog phases in catalog
/// order followed by phases outside the catalog in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl ProjectMatrix {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, phase: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == phase)
    }

    #[must_use]
    pub fn row(&self, project: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|row| row.project == project)
    }

    /// Status in the `(project, phase)` cell, if any.
    #[must_use]
    pub fn cell(&self, project: &str, phase: &str) -> Option<&str> {
        let idx = self.column_index(phase)?;
        self.row(project)?.cells.get(idx)?.as_deref()
    }
}

/// Order phase labels: catalog phases in catalog order, then unknown labels
/// in the order given. Duplicates are dropped.
#[must_use]
pub fn order_phase_columns<'a, I>(phases: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut known = Vec::new();
    let mut unknown = Vec::new();

    for phase in phases {
        if !seen.insert(phase) {
            continue;
        }
        match Phase::parse(phase) {
            Some(id) => known.push(id),
            None => unknown.push(phase.to_string()),
        }
    }

    known.sort();
    known
        .into_iter()
        .map(|phase| phase.as_str().to_string())
        .chain(unknown)
        .collect()
}

/// Builds summaries and matrices from flat record collections.
pub struct MatrixBuilder;

impl MatrixBuilder {
    /// Average score per project, sorted by project name.
    ///
    /// Each project's score is the half-up rounded mean over the records it
    /// has; phases without a record do not count. The input order of records
    /// does not influence the output order.
    #[must_use]
    pub fn summarize(records: &[ProgressRecord]) -> Vec<ProjectSummary> {
        let _span = engine_span("summarize", records.len()).entered();
        if records.is_empty() {
            log_empty_input(EmptyInputWarning {
                operation: "summarize",
            });
            return Vec::new();
        }

        let mut scores: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
        for record in records {
            scores
                .entry(record.project.as_str())
                .or_default()
                .push(score_of(&record.status));
        }

        let summaries: Vec<ProjectSummary> = scores
            .into_iter()
            .filter_map(|(project, project_scores)| {
                rounded_mean(&project_scores).map(|average_score| ProjectSummary {
                    project: project.to_string(),
                    average_score,
                })
            })
            .collect();

        debug!(projects = summaries.len(), "Summarized project progress");
        summaries
    }

    /// Pivot records into a project×phase matrix.
    ///
    /// With `for_project` set only that project's records are used.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] when two records share a
    /// `(project, phase)` cell, whether or not their statuses differ.
    pub fn to_matrix(
        records: &[ProgressRecord],
        for_project: Option<&str>,
    ) -> Result<ProjectMatrix, DuplicateKeyError> {
        let _span = engine_span("to_matrix", records.len()).entered();

        let selected: Vec<&ProgressRecord> = records
            .iter()
            .filter(|record| for_project.is_none_or(|project| record.project == project))
            .collect();

        if selected.is_empty() {
            log_empty_input(EmptyInputWarning {
                operation: "to_matrix",
            });
            return Ok(ProjectMatrix::default());
        }

        let mut cells: BTreeMap<&str, HashMap<&str, &str>> = BTreeMap::new();
        let mut encountered: Vec<&str> = Vec::new();

        for record in &selected {
            let row = cells.entry(record.project.as_str()).or_default();
            if let Some(existing) = row.insert(record.phase.as_str(), record.status.as_str()) {
                let err = DuplicateKeyError {
                    project: record.project.clone(),
                    phase: record.phase.clone(),
                    first_status: existing.to_string(),
                    second_status: record.status.clone(),
                };
                log_duplicate_key(&err);
                return Err(err);
            }
            encountered.push(record.phase.as_str());
        }

        let columns = order_phase_columns(encountered);
        let rows: Vec<MatrixRow> = cells
            .into_iter()
            .map(|(project, statuses)| MatrixRow {
                project: project.to_string(),
                cells: columns
                    .iter()
                    .map(|column| statuses.get(column.as_str()).map(|s| (*s).to_string()))
                    .collect(),
            })
            .collect();

        debug!(
            rows = rows.len(),
            columns = columns.len(),
            "Built project matrix"
        );
        Ok(ProjectMatrix { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phaseboard_utils::test_support::{record, sample_portfolio};

    #[test]
    fn test_summarize_acme_scenario() {
        let records = vec![
            record("Acme", "Inventarisatie", "Voltooid"),
            record("Acme", "Configuratie", "Bezig"),
        ];
        let summaries = MatrixBuilder::summarize(&records);
        assert_eq!(
            summaries,
            vec![ProjectSummary {
                project: "Acme".to_string(),
                average_score: 75
            }]
        );
    }

    #[test]
    fn test_summarize_is_sorted_by_project() {
        let records = vec![
            record("Zeta", "Training", "Voltooid"),
            record("Alpha", "Training", "Start"),
            record("Midas", "Training", "Bezig"),
            record("Alpha", "Go-Live", "Bezig"),
        ];
        let names: Vec<String> = MatrixBuilder::summarize(&records)
            .into_iter()
            .map(|summary| summary.project)
            .collect();
        assert_eq!(names, vec!["Alpha", "Midas", "Zeta"]);
    }

    #[test]
    fn test_summarize_excludes_missing_phases() {
        // One record only: the four missing phases do not pull the average down.
        let records = vec![record("Acme", "Go-Live", "Voltooid")];
        assert_eq!(MatrixBuilder::summarize(&records)[0].average_score, 100);
    }

    #[test]
    fn test_summarize_unknown_status_scores_zero() {
        let records = vec![
            record("Acme", "Training", "Voltooid"),
            record("Acme", "Go-Live", "Afgerond"),
        ];
        assert_eq!(MatrixBuilder::summarize(&records)[0].average_score, 50);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(MatrixBuilder::summarize(&[]).is_empty());
    }

    #[test]
    fn test_matrix_column_order_follows_catalog() {
        let records = vec![
            record("Acme", "Go-Live", "Start"),
            record("Acme", "Inventarisatie", "Voltooid"),
            record("Acme", "Training", "Bezig"),
        ];
        let matrix = MatrixBuilder::to_matrix(&records, None).unwrap();
        assert_eq!(matrix.columns, vec!["Inventarisatie", "Training", "Go-Live"]);
        assert_eq!(
            matrix.rows[0].cells,
            vec![
                Some("Voltooid".to_string()),
                Some("Bezig".to_string()),
                Some("Start".to_string())
            ]
        );
    }

    #[test]
    fn test_matrix_appends_unknown_phases_in_encounter_order() {
        let records = vec![
            record("Acme", "Nazorg", "Start"),
            record("Acme", "Go-Live", "Start"),
            record("Acme", "Evaluatie", "Bezig"),
            record("Acme", "Inventarisatie", "Voltooid"),
        ];
        let matrix = MatrixBuilder::to_matrix(&records, None).unwrap();
        assert_eq!(
            matrix.columns,
            vec!["Inventarisatie", "Go-Live", "Nazorg", "Evaluatie"]
        );
    }

    #[test]
    fn test_matrix_leaves_missing_cells_empty() {
        let matrix = MatrixBuilder::to_matrix(&sample_portfolio(), None).unwrap();
        assert_eq!(
            matrix.rows.iter().map(|r| r.project.as_str()).collect::<Vec<_>>(),
            vec!["Acme", "Globex", "Initech"]
        );
        assert_eq!(matrix.cell("Acme", "Inventarisatie"), Some("Voltooid"));
        assert_eq!(matrix.cell("Acme", "Training"), None);
        assert_eq!(matrix.cell("Initech", "Training"), Some("Afgerond"));
        assert_eq!(matrix.cell("Initech", "Go-Live"), None);
        for row in &matrix.rows {
            assert_eq!(row.cells.len(), matrix.columns.len());
        }
    }

    #[test]
    fn test_matrix_duplicate_key_is_rejected() {
        let records = vec![
            record("Acme", "Training", "Start"),
            record("Acme", "Training", "Bezig"),
        ];
        let err = MatrixBuilder::to_matrix(&records, None).unwrap_err();
        assert_eq!(err.project, "Acme");
        assert_eq!(err.phase, "Training");
        assert_eq!(err.first_status, "Start");
        assert_eq!(err.second_status, "Bezig");
    }

    #[test]
    fn test_matrix_identical_duplicate_is_rejected() {
        let records = vec![
            record("Acme", "Training", "Start"),
            record("Acme", "Training", "Start"),
        ];
        assert!(MatrixBuilder::to_matrix(&records, None).is_err());
    }

    #[test]
    fn test_matrix_for_project_filters_rows() {
        let matrix = MatrixBuilder::to_matrix(&sample_portfolio(), Some("Acme")).unwrap();
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.columns, vec!["Inventarisatie", "Configuratie"]);
    }

    #[test]
    fn test_matrix_filter_ignores_duplicates_elsewhere() {
        let mut records = sample_portfolio();
        records.push(record("Globex", "Training", "Voltooid"));
        assert!(MatrixBuilder::to_matrix(&records, None).is_err());
        assert!(MatrixBuilder::to_matrix(&records, Some("Acme")).is_ok());
    }

    #[test]
    fn test_matrix_empty_and_unmatched_filter() {
        assert!(MatrixBuilder::to_matrix(&[], None).unwrap().is_empty());
        let matrix = MatrixBuilder::to_matrix(&sample_portfolio(), Some("Umbrella")).unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.columns.is_empty());
    }

    #[test]
    fn test_matrix_is_idempotent() {
        let records = sample_portfolio();
        let first = MatrixBuilder::to_matrix(&records, None).unwrap();
        let second = MatrixBuilder::to_matrix(&records, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_phase_columns_dedupes() {
        let ordered = order_phase_columns(["Training", "X", "Training", "Inventarisatie", "X"]);
        assert_eq!(ordered, vec!["Inventarisatie", "Training", "X"]);
    }
}
