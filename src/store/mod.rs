mod error;
mod file;
mod memory;
mod retry;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use retry::RetryPolicy;

#[cfg(test)]
pub(crate) use memory::tests::record as sample_record;

use crate::ephemeris::StateVector;

/// Key-value access to state vectors, keyed by epoch.
///
/// Enumeration follows insertion order. Ingestion replaces the whole
/// contents at once; there is no per-record write.
pub trait RecordStore: Send + Sync {
    fn get(&self, epoch: &str) -> Result<Option<StateVector>, StoreError>;

    fn exists(&self, epoch: &str) -> Result<bool, StoreError>;

    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// `limit: None` runs to the end; an offset past the end is empty.
    fn list_range(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<(String, StateVector)>, StoreError>;

    /// Swap in a fresh set of records and return how many were kept.
    fn replace_all(&self, records: Vec<StateVector>) -> Result<usize, StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
