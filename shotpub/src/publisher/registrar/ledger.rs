//! JSON ledger registrar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{
    PublishRecord, RecordHandle, Registrar, RegistrarError, ReviewVersion, StoredRecord,
    StoredReviewVersion, STATUS_ACTIVE,
};
use crate::context::PipelineContext;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    records: Vec<StoredRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    review_versions: Vec<StoredReviewVersion>,
}

/// Registrar that appends records to a JSON file.
///
/// The file is re-read on every call so several processes see each
/// other's records. Writes from this process are serialized; there is no
/// cross-process locking.
#[derive(Debug)]
pub struct LedgerRegistrar {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LedgerRegistrar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LedgerFile, RegistrarError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LedgerFile::default()),
            Err(source) => {
                return Err(RegistrarError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(LedgerFile::default());
        }
        serde_json::from_str(&content).map_err(|source| RegistrarError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, ledger: &LedgerFile) -> Result<(), RegistrarError> {
        let io_err = |source| RegistrarError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl Registrar for LedgerRegistrar {
    fn register(&self, record: &PublishRecord) -> Result<RecordHandle, RegistrarError> {
        let _guard = self.lock.lock();
        let mut ledger = self.load()?;

        ledger.next_id += 1;
        let stored = StoredRecord {
            id: ledger.next_id,
            status: Some(STATUS_ACTIVE.to_string()),
            record: record.clone(),
        };
        let handle = stored.handle();
        ledger.records.push(stored);

        self.save(&ledger)?;
        Ok(handle)
    }

    fn find_conflicting(
        &self,
        name: &str,
        context: &PipelineContext,
        exclude_id: u64,
    ) -> Result<Vec<StoredRecord>, RegistrarError> {
        let _guard = self.lock.lock();
        Ok(self
            .load()?
            .records
            .into_iter()
            .filter(|r| r.conflicts_with(name, context, exclude_id))
            .collect())
    }

    fn clear_status(&self, ids: &[u64]) -> Result<usize, RegistrarError> {
        let _guard = self.lock.lock();
        let mut ledger = self.load()?;
        let mut changed = 0;
        for record in ledger.records.iter_mut().filter(|r| ids.contains(&r.id)) {
            if record.status.take().is_some() {
                changed += 1;
            }
        }
        if changed > 0 {
            self.save(&ledger)?;
        }
        Ok(changed)
    }

    fn records(&self) -> Result<Vec<StoredRecord>, RegistrarError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.records)
    }

    fn create_version(&self, version: &ReviewVersion) -> Result<u64, RegistrarError> {
        let _guard = self.lock.lock();
        let mut ledger = self.load()?;

        ledger.next_id += 1;
        let id = ledger.next_id;
        ledger.review_versions.push(StoredReviewVersion {
            id,
            version: version.clone(),
        });

        self.save(&ledger)?;
        Ok(id)
    }

    fn review_versions(&self) -> Result<Vec<StoredReviewVersion>, RegistrarError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.review_versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, version: u64) -> PublishRecord {
        PublishRecord::new(
            format!("/p/publishes/{}", name),
            name,
            version,
            "Maya Scene",
            PipelineContext::new(),
        )
        .with_comment(Some("first pass".to_string()))
    }

    #[test]
    fn test_missing_ledger_is_empty() {
        let temp = TempDir::new().unwrap();
        let registrar = LedgerRegistrar::new(temp.path().join("ledger.json"));
        assert!(registrar.records().unwrap().is_empty());
    }

    #[test]
    fn test_records_persist_across_instances() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("ledger.json");

        let handle = LedgerRegistrar::new(&path)
            .register(&record("a.ma", 1))
            .unwrap();
        assert_eq!(handle.id, 1);

        let reopened = LedgerRegistrar::new(&path);
        let second = reopened.register(&record("a.ma", 2)).unwrap();
        assert_eq!(second.id, 2);

        let records = reopened.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.comment.as_deref(), Some("first pass"));
    }

    #[test]
    fn test_clear_status_is_saved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        let registrar = LedgerRegistrar::new(&path);
        registrar.register(&record("a.ma", 1)).unwrap();
        let latest = registrar.register(&record("a.ma", 2)).unwrap();

        let ids: Vec<u64> = registrar
            .find_conflicting("a.ma", &PipelineContext::new(), latest.id)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1]);
        registrar.clear_status(&ids).unwrap();

        let records = LedgerRegistrar::new(&path).records().unwrap();
        assert_eq!(records[0].status, None);
        assert_eq!(records[1].status.as_deref(), Some(STATUS_ACTIVE));
    }

    #[test]
    fn test_review_versions_persist_next_to_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        let registrar = LedgerRegistrar::new(&path);
        let published = registrar.register(&record("a.ma", 1)).unwrap();

        let version = ReviewVersion::new("pb.mov", &PipelineContext::new())
            .with_media(Some(PathBuf::from("/p/movies/pb.mov")))
            .with_published_files(vec![published.id]);
        let id = registrar.create_version(&version).unwrap();
        assert_eq!(id, 2);

        let reopened = LedgerRegistrar::new(&path);
        let versions = reopened.review_versions().unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version.published_file_ids, vec![1]);
        assert_eq!(reopened.records().unwrap().len(), 1);
        assert_eq!(reopened.register(&record("a.ma", 2)).unwrap().id, 3);
    }

    #[test]
    fn test_corrupt_ledger() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();
        let err = LedgerRegistrar::new(&path).records().unwrap_err();
        assert!(matches!(err, RegistrarError::Corrupt { .. }));
    }
}
