//! Cached read models and validated writes over a record store.
//!
//! Reads go through a [`RecordCache`] keyed by the query string, so one
//! command or render cycle fetches each record set once. Every write that
//! reaches the store clears the cache before returning, failed or not, so a
//! read after a write always sees what the store holds.

use std::time::Duration;

use tracing::{info, warn};

use phaseboard_config::Config;
use phaseboard_utils::cache::{CacheStats, RecordCache};
use phaseboard_utils::error::{PhaseboardError, StoreError, ValidationError};
use phaseboard_utils::logging::log_cache_stats;
use phaseboard_utils::types::{Phase, ProgressRecord, ProjectSummary, Status};

use crate::dashboard::{PortfolioOverview, ProjectDetail, build_overview, build_project_detail};
use crate::export::{ExportOptions, ReportExporter};
use crate::matrix::{MatrixBuilder, ProjectMatrix};
use crate::store::ProgressRecordStore;

const ALL_RECORDS_QUERY: &str = "records:all";

fn project_query(project: &str) -> String {
    format!("records:project:{project}")
}

/// Parse a `PHASE=STATUS` assignment against the catalog.
///
/// # Errors
///
/// [`ValidationError::MalformedAssignment`] without an `=`, otherwise the
/// phase or status error for labels outside the catalog.
pub fn parse_assignment(input: &str) -> Result<(Phase, Status), ValidationError> {
    let (phase, status) =
        input
            .split_once('=')
            .ok_or_else(|| ValidationError::MalformedAssignment {
                input: input.to_string(),
            })?;
    let (phase, status) = (phase.trim(), status.trim());
    let phase = Phase::parse(phase).ok_or_else(|| ValidationError::UnknownPhase {
        phase: phase.to_string(),
    })?;
    let status = Status::parse(status).ok_or_else(|| ValidationError::UnknownStatus {
        status: status.to_string(),
    })?;
    Ok((phase, status))
}

/// Project portfolio backed by a record store.
#[derive(Debug)]
pub struct Portfolio<S> {
    store: S,
    cache: RecordCache<Vec<ProgressRecord>>,
    exporter: ReportExporter,
}

impl<S: ProgressRecordStore> Portfolio<S> {
    /// Portfolio with the default export layout.
    #[must_use]
    pub fn new(store: S, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: RecordCache::new(cache_ttl),
            exporter: ReportExporter::default(),
        }
    }

    /// Portfolio using the cache TTL and export layout of `config`.
    #[must_use]
    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            store,
            cache: RecordCache::new(config.cache_ttl()),
            exporter: ReportExporter::new(ExportOptions::from_config(config)),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        *self.cache.stats()
    }

    /// Emit cache statistics at debug level.
    pub fn log_cache_stats(&self) {
        log_cache_stats(self.cache.stats());
    }

    // ---- reads ----

    pub fn records(&mut self) -> Result<Vec<ProgressRecord>, PhaseboardError> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_try_insert_with(ALL_RECORDS_QUERY, || store.fetch_all())?)
    }

    pub fn project_records(&mut self, project: &str) -> Result<Vec<ProgressRecord>, PhaseboardError> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_try_insert_with(&project_query(project), || store.fetch_project(project))?)
    }

    /// Distinct project names, sorted.
    pub fn project_names(&mut self) -> Result<Vec<String>, PhaseboardError> {
        let mut names: Vec<String> = self
            .records()?
            .into_iter()
            .map(|record| record.project)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    pub fn summaries(&mut self) -> Result<Vec<ProjectSummary>, PhaseboardError> {
        Ok(MatrixBuilder::summarize(&self.records()?))
    }

    pub fn matrix(&mut self, for_project: Option<&str>) -> Result<ProjectMatrix, PhaseboardError> {
        let records = match for_project {
            Some(project) => self.project_records(project)?,
            None => self.records()?,
        };
        Ok(MatrixBuilder::to_matrix(&records, for_project)?)
    }

    pub fn overview(&mut self) -> Result<PortfolioOverview, PhaseboardError> {
        Ok(build_overview(&self.records()?))
    }

    pub fn project_detail(&mut self, project: &str) -> Result<ProjectDetail, PhaseboardError> {
        let records = self.project_records(project)?;
        build_project_detail(project, &records)
    }

    /// Render the whole portfolio as workbook bytes.
    pub fn export(&mut self) -> Result<Vec<u8>, PhaseboardError> {
        let records = self.records()?;
        self.exporter.render(&records)
    }

    // ---- writes ----

    /// Create `name` with one record per catalog phase.
    ///
    /// Phases missing from `statuses` start as `Nog niet gestart`. Returns the
    /// number of records written.
    pub fn create_project(
        &mut self,
        name: &str,
        statuses: &[(Phase, Status)],
    ) -> Result<usize, PhaseboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProject.into());
        }
        self.ensure_absent(name)?;

        let records: Vec<ProgressRecord> = Phase::ALL
            .into_iter()
            .map(|phase| {
                let status = statuses
                    .iter()
                    .rev()
                    .find(|(assigned, _)| *assigned == phase)
                    .map(|(_, status)| *status)
                    .unwrap_or_default();
                ProgressRecord::from_parts(name, phase, status)
            })
            .collect();
        let written = self.store.upsert_all(records);
        if let Err(error) = written {
            // `name` held no records before the batch, so dropping them all
            // undoes a partial write.
            if let Err(rollback) = self.store.delete(name) {
                warn!(project = name, error = %rollback, "Could not roll back partial create");
            }
            self.after_write();
            return Err(error.into());
        }
        self.after_write();

        info!(project = name, "Created project");
        Ok(Phase::ALL.len())
    }

    /// Set the status of one phase of an existing project.
    pub fn update_status(
        &mut self,
        project: &str,
        phase: &str,
        status: &str,
    ) -> Result<(), PhaseboardError> {
        let record = ProgressRecord::validated(project, phase, status)?;
        self.ensure_present(&record.project)?;

        let written = self.store.upsert(record.clone());
        self.after_write();
        written?;

        info!(
            project = %record.project,
            phase = %record.phase,
            status = %record.status,
            "Updated status"
        );
        Ok(())
    }

    /// Move every record of `from` to the name `to`.
    pub fn rename_project(&mut self, from: &str, to: &str) -> Result<usize, PhaseboardError> {
        let (from, to) = (from.trim(), to.trim());
        if to.is_empty() {
            return Err(ValidationError::EmptyProject.into());
        }
        self.ensure_present(from)?;
        if from != to {
            self.ensure_absent(to)?;
        }

        let moved = self.store.rename(from, to);
        self.after_write();
        let moved = moved?;

        info!(from, to, records = moved, "Renamed project");
        Ok(moved)
    }

    /// Remove every record of `name`. Returns the number removed.
    pub fn delete_project(&mut self, name: &str) -> Result<usize, PhaseboardError> {
        let removed = self.store.delete(name);
        self.after_write();
        let removed = removed?;
        if removed == 0 {
            return Err(StoreError::ProjectNotFound {
                project: name.to_string(),
            }
            .into());
        }

        info!(project = name, records = removed, "Deleted project");
        Ok(removed)
    }

    fn ensure_present(&self, project: &str) -> Result<(), PhaseboardError> {
        // Existence checks bypass the cache.
        if self.store.fetch_project(project)?.is_empty() {
            return Err(StoreError::ProjectNotFound {
                project: project.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn ensure_absent(&self, project: &str) -> Result<(), PhaseboardError> {
        if !self.store.fetch_project(project)?.is_empty() {
            return Err(StoreError::ProjectExists {
                project: project.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn after_write(&mut self) {
        self.cache.invalidate_all();
    }
}
