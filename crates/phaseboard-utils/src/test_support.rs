//! Record builders shared by unit and integration tests.

use crate::types::{Phase, ProgressRecord, Status};

/// Shorthand for an unvalidated record.
#[must_use]
pub fn record(project: &str, phase: &str, status: &str) -> ProgressRecord {
    ProgressRecord::new(project, phase, status)
}

/// One record per catalog phase, statuses assigned in catalog order.
#[must_use]
pub fn full_project(project: &str, statuses: [Status; 5]) -> Vec<ProgressRecord> {
    Phase::ALL
        .into_iter()
        .zip(statuses)
        .map(|(phase, status)| ProgressRecord::from_parts(project, phase, status))
        .collect()
}

/// A small mixed portfolio:
/// - `Acme`: Inventarisatie Voltooid, Configuratie Bezig (average 75)
/// - `Globex`: all five phases (average 32)
/// - `Initech`: one legacy status outside the catalog (average 0)
#[must_use]
pub fn sample_portfolio() -> Vec<ProgressRecord> {
    let mut records = vec![
        record("Acme", "Inventarisatie", "Voltooid"),
        record("Acme", "Configuratie", "Bezig"),
    ];
    records.extend(full_project(
        "Globex",
        [
            Status::Completed,
            Status::InProgress,
            Status::Started,
            Status::NotStarted,
            Status::NotStarted,
        ],
    ));
    records.push(record("Initech", "Training", "Afgerond"));
    records
}
