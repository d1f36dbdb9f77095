use std::fs;
use std::path::{Path, PathBuf};

use crate::ephemeris::StateVector;

use super::{MemoryStore, RecordStore, StoreError};

/// Memory store mirrored to a JSON snapshot, so a restart can serve the
/// last ingested ephemeris before the feed is reachable again.
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let records: Vec<StateVector> = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        log::info!(
            "Opened snapshot {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            memory: MemoryStore::with_records(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, snapshot: &[StateVector]) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn get(&self, epoch: &str) -> Result<Option<StateVector>, StoreError> {
        self.memory.get(epoch)
    }

    fn exists(&self, epoch: &str) -> Result<bool, StoreError> {
        self.memory.exists(epoch)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.memory.keys()
    }

    fn list_range(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<(String, StateVector)>, StoreError> {
        self.memory.list_range(offset, limit)
    }

    fn replace_all(&self, records: Vec<StateVector>) -> Result<usize, StoreError> {
        // Memory is only swapped once the snapshot is on disk.
        let snapshot = MemoryStore::with_records(records).snapshot()?;
        self.persist(&snapshot)?;
        self.memory.replace_all(snapshot)
    }

    fn len(&self) -> Result<usize, StoreError> {
        self.memory.len()
    }
}
