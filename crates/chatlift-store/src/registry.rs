//! Destination contact registry persistence.
//!
//! The registry file is read, normalized, appended to, and rewritten as a
//! whole on each run that produced new rows. A run with zero new rows does
//! not touch the file at all. The store is the sole reader and writer of
//! the file.

use chatlift_core::model::MigrationResult;
use chatlift_core::registry::{self, CANONICAL_HEADERS, RegistryRow};
use chatlift_core::{ChatliftError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// File-backed store for the contact registry.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Merges new migration results into the registry and rewrites it.
    ///
    /// Existing rows are preserved in order (normalized to the canonical
    /// headers); new rows are appended after them. With no new results the
    /// file is left untouched, including when it does not yet exist.
    pub fn append_results(&self, results: &[MigrationResult]) -> Result<()> {
        if results.is_empty() {
            info!("no new registry rows to persist, leaving {:?} untouched", self.path);
            return Ok(());
        }

        let existing = self.read_rows();
        let combined = registry::merge(&existing, results);
        self.write_rows(&combined)?;
        info!(
            "wrote {} registry row(s) ({} existing, {} new) to {:?}",
            combined.len(),
            existing.len(),
            results.len(),
            self.path
        );
        Ok(())
    }

    /// Reads the existing registry rows as header-keyed maps.
    ///
    /// An absent file is zero rows, not an error. An unreadable file is
    /// logged and also treated as zero rows; the rewrite will start fresh.
    pub fn read_rows(&self) -> Vec<HashMap<String, String>> {
        if !self.path.exists() {
            return Vec::new();
        }
        match self.try_read_rows() {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    "unable to read existing registry at {:?}, starting fresh: {}",
                    self.path, e
                );
                Vec::new()
            }
        }
    }

    fn try_read_rows(&self) -> Result<Vec<HashMap<String, String>>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| ChatliftError::store(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| ChatliftError::store(e.to_string()))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ChatliftError::store(e.to_string()))?;
            rows.push(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            );
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[RegistryRow]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatliftError::store(format!(
                    "failed to create registry directory {:?}: {}",
                    parent, e
                ))
            })?;
        }

        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| {
            ChatliftError::store(format!("failed to open registry {:?} for writing: {}", self.path, e))
        })?;
        writer
            .write_record(CANONICAL_HEADERS)
            .map_err(|e| ChatliftError::store(e.to_string()))?;
        for row in rows {
            writer
                .write_record(row.to_record())
                .map_err(|e| ChatliftError::store(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| ChatliftError::store(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(source: &str, ids: &[&str]) -> MigrationResult {
        MigrationResult {
            source_user_id: source.to_string(),
            destination_user_id: format!("dest-{}", source),
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            phone: String::new(),
            conversation_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_append_to_absent_file_writes_canonical_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        let store = RegistryStore::new(&path);

        store.append_results(&[result("u1", &["c1", "c2"])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "sourceUserId,destinationUserId,name,email,phone,Conversation_ids"
        );
        assert_eq!(lines.next().unwrap(), "u1,dest-u1,Ada,a@x.com,,\"c1,c2\"");
    }

    #[test]
    fn test_no_results_means_no_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        let store = RegistryStore::new(&path);

        store.append_results(&[]).unwrap();
        assert!(!path.exists());

        // an existing file stays byte-for-byte unmodified
        std::fs::write(&path, "sourceUserId\nu1\n").unwrap();
        store.append_results(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sourceUserId\nu1\n");
    }

    #[test]
    fn test_existing_legacy_rows_are_normalized_and_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        std::fs::write(
            &path,
            "Source User Id,DestinationUserId,Name,Email,Phone,conversation_ids\n\
             old-1,dest-old,Old Row,o@x.com,555,c9\n",
        )
        .unwrap();

        let store = RegistryStore::new(&path);
        store.append_results(&[result("u1", &["c1"])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "sourceUserId,destinationUserId,name,email,phone,Conversation_ids"
        );
        assert_eq!(lines[1], "old-1,dest-old,Old Row,o@x.com,555,c9");
        assert_eq!(lines[2], "u1,dest-u1,Ada,a@x.com,,c1");
    }

    #[test]
    fn test_rerun_appends_a_second_row_for_the_same_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        let store = RegistryStore::new(&path);

        store.append_results(&[result("u1", &["c1"])]).unwrap();
        store.append_results(&[result("u1", &["c2"])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("u1,"));
        assert!(rows[1].starts_with("u1,"));
    }

    #[test]
    fn test_unreadable_registry_reads_as_zero_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        // a file whose rows do not match its header arity
        std::fs::write(&path, "sourceUserId,name\nu1\n").unwrap();

        let store = RegistryStore::new(&path);
        assert!(store.read_rows().is_empty());
    }
}
