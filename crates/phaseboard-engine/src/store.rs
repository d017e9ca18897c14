//! Persistence of `(project, phase, status)` records.
//!
//! The engine reads whole record sets and writes single records or one
//! project's batch, so the store contract is small. Implementations must keep at most one record per
//! `(project, phase)` key on write; loaders still hand back whatever they
//! find so that the matrix builder can report broken data.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use phaseboard_utils::atomic_write::write_file_atomic;
use phaseboard_utils::error::StoreError;
use phaseboard_utils::types::ProgressRecord;

/// Read and write access to progress records.
pub trait ProgressRecordStore {
    /// Every stored record, in storage order.
    fn fetch_all(&self) -> Result<Vec<ProgressRecord>, StoreError>;

    /// Records of one project.
    fn fetch_project(&self, project: &str) -> Result<Vec<ProgressRecord>, StoreError> {
        Ok(self
            .fetch_all()?
            .into_iter()
            .filter(|record| record.project == project)
            .collect())
    }

    /// Insert `record`, replacing any record with the same key.
    fn upsert(&mut self, record: ProgressRecord) -> Result<(), StoreError>;

    /// Upsert a batch of records.
    ///
    /// The default writes one record at a time and may stop partway through.
    /// Stores that can commit the batch in one step should override it.
    fn upsert_all(&mut self, records: Vec<ProgressRecord>) -> Result<(), StoreError> {
        for record in records {
            self.upsert(record)?;
        }
        Ok(())
    }

    /// Remove every record of `project`. Returns the number removed.
    fn delete(&mut self, project: &str) -> Result<usize, StoreError>;

    /// Move every record of `from` to `to`. Returns the number moved.
    fn rename(&mut self, from: &str, to: &str) -> Result<usize, StoreError> {
        let records = self.fetch_project(from)?;
        self.delete(from)?;
        for record in &records {
            self.upsert(ProgressRecord::new(to, &record.phase, &record.status))?;
        }
        Ok(records.len())
    }
}

/// Apply an upsert to an in-memory record list.
///
/// The first record with the same key is replaced in place and any further
/// records with that key are dropped.
fn upsert_into(records: &mut Vec<ProgressRecord>, record: ProgressRecord) {
    let mut replaced = false;
    records.retain_mut(|existing| {
        if existing.key() != record.key() {
            return true;
        }
        if replaced {
            return false;
        }
        existing.status.clone_from(&record.status);
        replaced = true;
        true
    });
    if !replaced {
        records.push(record);
    }
}

fn delete_from(records: &mut Vec<ProgressRecord>, project: &str) -> usize {
    let before = records.len();
    records.retain(|record| record.project != project);
    before - records.len()
}

/// Store backed by a `Vec`, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<ProgressRecord>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with `records` as given, duplicates included.
    #[must_use]
    pub fn from_records(records: Vec<ProgressRecord>) -> Self {
        Self { records }
    }
}

impl ProgressRecordStore for InMemoryStore {
    fn fetch_all(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn upsert(&mut self, record: ProgressRecord) -> Result<(), StoreError> {
        upsert_into(&mut self.records, record);
        Ok(())
    }

    fn delete(&mut self, project: &str) -> Result<usize, StoreError> {
        Ok(delete_from(&mut self.records, project))
    }
}

/// Store persisted as a pretty-printed JSON array.
///
/// A missing file reads as an empty store. Every write rewrites the file
/// atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Utf8PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path, "Record file missing, starting empty");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.read_failed(e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<ProgressRecord> =
            serde_json::from_str(&content).map_err(|e| self.read_failed(e))?;
        debug!(path = %self.path, records = records.len(), "Loaded records");
        Ok(records)
    }

    fn save(&self, records: &[ProgressRecord]) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(records).map_err(|e| self.write_failed(e))?;
        json.push('\n');
        write_file_atomic(&self.path, &json).map_err(|e| self.write_failed(format!("{e:#}")))?;
        debug!(path = %self.path, records = records.len(), "Saved records");
        Ok(())
    }

    fn read_failed(&self, reason: impl ToString) -> StoreError {
        StoreError::ReadFailed {
            path: self.path.to_string(),
            reason: reason.to_string(),
        }
    }

    fn write_failed(&self, reason: impl ToString) -> StoreError {
        StoreError::WriteFailed {
            path: self.path.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ProgressRecordStore for JsonFileStore {
    fn fetch_all(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        self.load()
    }

    fn upsert(&mut self, record: ProgressRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        upsert_into(&mut records, record);
        self.save(&records)
    }

    fn upsert_all(&mut self, batch: Vec<ProgressRecord>) -> Result<(), StoreError> {
        let mut records = self.load()?;
        for record in batch {
            upsert_into(&mut records, record);
        }
        self.save(&records)
    }

    fn delete(&mut self, project: &str) -> Result<usize, StoreError> {
        let mut records = self.load()?;
        let removed = delete_from(&mut records, project);
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<usize, StoreError> {
        // Single load and save so the file never holds a half-renamed project.
        let mut records = self.load()?;
        let mut moved = 0;
        for record in records.iter_mut().filter(|record| record.project == from) {
            record.project = to.to_string();
            moved += 1;
        }
        if moved > 0 {
            self.save(&records)?;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phaseboard_utils::test_support::{record, sample_portfolio};
    use tempfile::TempDir;

    fn temp_store(dir: &TempDir) -> JsonFileStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("data").join("projects.json"))
            .unwrap();
        JsonFileStore::new(path)
    }

    #[test]
    fn test_upsert_replaces_instead_of_duplicating() {
        let mut store = InMemoryStore::new();
        store.upsert(record("Acme", "Training", "Start")).unwrap();
        store.upsert(record("Acme", "Training", "Bezig")).unwrap();

        assert_eq!(
            store.fetch_all().unwrap(),
            vec![record("Acme", "Training", "Bezig")]
        );
    }

    #[test]
    fn test_upsert_collapses_existing_duplicates() {
        let mut store = InMemoryStore::from_records(vec![
            record("Acme", "Training", "Start"),
            record("Acme", "Go-Live", "Start"),
            record("Acme", "Training", "Bezig"),
        ]);
        store.upsert(record("Acme", "Training", "Voltooid")).unwrap();

        assert_eq!(
            store.fetch_all().unwrap(),
            vec![
                record("Acme", "Training", "Voltooid"),
                record("Acme", "Go-Live", "Start"),
            ]
        );
    }

    #[test]
    fn test_delete_and_fetch_project() {
        let mut store = InMemoryStore::from_records(sample_portfolio());
        assert_eq!(store.fetch_project("Acme").unwrap().len(), 2);
        assert_eq!(store.delete("Globex").unwrap(), 5);
        assert_eq!(store.delete("Globex").unwrap(), 0);
        assert!(store.fetch_project("Globex").unwrap().is_empty());
    }

    #[test]
    fn test_default_rename_moves_records() {
        let mut store = InMemoryStore::from_records(sample_portfolio());
        assert_eq!(store.rename("Acme", "Acme BV").unwrap(), 2);
        assert!(store.fetch_project("Acme").unwrap().is_empty());
        assert_eq!(store.fetch_project("Acme BV").unwrap().len(), 2);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        assert!(store.fetch_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_json_store_persists_across_instances() {
        let temp = TempDir::new().unwrap();
        let mut store = temp_store(&temp);
        store.upsert(record("Acme", "Training", "Start")).unwrap();
        store.upsert(record("Acme", "Go-Live", "Bezig")).unwrap();
        store.upsert(record("Acme", "Training", "Voltooid")).unwrap();

        let reopened = JsonFileStore::new(store.path().to_path_buf());
        assert_eq!(
            reopened.fetch_all().unwrap(),
            vec![
                record("Acme", "Training", "Voltooid"),
                record("Acme", "Go-Live", "Bezig"),
            ]
        );

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.ends_with('\n'));
        assert!(!content.contains('\r'));
    }

    #[test]
    fn test_json_store_keeps_duplicates_on_load() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"[
  {"project": "Acme", "phase": "Training", "status": "Start"},
  {"project": "Acme", "phase": "Training", "status": "Bezig"}
]"#,
        )
        .unwrap();

        assert_eq!(store.fetch_all().unwrap().len(), 2);
    }

    #[test]
    fn test_json_store_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.fetch_all(),
            Err(StoreError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_json_store_upsert_all_writes_batch() {
        let temp = TempDir::new().unwrap();
        let mut store = temp_store(&temp);
        store.upsert(record("Acme", "Training", "Start")).unwrap();
        store
            .upsert_all(vec![
                record("Acme", "Training", "Voltooid"),
                record("Acme", "Go-Live", "Bezig"),
                record("Globex", "Training", "Start"),
            ])
            .unwrap();

        let reopened = JsonFileStore::new(store.path().to_path_buf());
        assert_eq!(
            reopened.fetch_all().unwrap(),
            vec![
                record("Acme", "Training", "Voltooid"),
                record("Acme", "Go-Live", "Bezig"),
                record("Globex", "Training", "Start"),
            ]
        );
    }

    #[test]
    fn test_json_store_rename_and_delete() {
        let temp = TempDir::new().unwrap();
        let mut store = temp_store(&temp);
        for record in sample_portfolio() {
            store.upsert(record).unwrap();
        }

        assert_eq!(store.rename("Initech", "Initrode").unwrap(), 1);
        assert_eq!(store.rename("Missing", "Other").unwrap(), 0);
        assert_eq!(store.delete("Acme").unwrap(), 2);

        let projects: Vec<String> = store
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|record| record.project)
            .collect();
        assert!(projects.contains(&"Initrode".to_string()));
        assert!(!projects.contains(&"Initech".to_string()));
        assert!(!projects.contains(&"Acme".to_string()));
    }
}
