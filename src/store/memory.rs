use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ephemeris::StateVector;

use super::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct Records {
    order: Vec<String>,
    by_epoch: HashMap<String, StateVector>,
}

impl Records {
    fn from_vec(records: Vec<StateVector>) -> Self {
        let mut result = Records::default();
        for record in records {
            // Duplicate epochs keep their first slot; the later record wins.
            if !result.by_epoch.contains_key(&record.epoch) {
                result.order.push(record.epoch.clone());
            }
            result.by_epoch.insert(record.epoch.clone(), record);
        }
        result
    }
}

/// Ordered in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<StateVector>) -> Self {
        Self {
            records: RwLock::new(Records::from_vec(records)),
        }
    }

    /// All records in enumeration order.
    pub fn snapshot(&self) -> Result<Vec<StateVector>, StoreError> {
        let records = self.read()?;
        Ok(records
            .order
            .iter()
            .filter_map(|epoch| records.by_epoch.get(epoch).cloned())
            .collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, StoreError> {
        self.records.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, StoreError> {
        self.records.write().map_err(|_| StoreError::Poisoned)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, epoch: &str) -> Result<Option<StateVector>, StoreError> {
        Ok(self.read()?.by_epoch.get(epoch).cloned())
    }

    fn exists(&self, epoch: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.by_epoch.contains_key(epoch))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.order.clone())
    }

    fn list_range(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<(String, StateVector)>, StoreError> {
        let records = self.read()?;
        Ok(records
            .order
            .iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|epoch| {
                records
                    .by_epoch
                    .get(epoch)
                    .map(|record| (epoch.clone(), record.clone()))
            })
            .collect())
    }

    fn replace_all(&self, records: Vec<StateVector>) -> Result<usize, StoreError> {
        let fresh = Records::from_vec(records);
        let count = fresh.order.len();
        *self.write()? = fresh;
        Ok(count)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.order.len())
    }
}
