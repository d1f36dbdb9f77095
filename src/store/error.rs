use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store lock poisoned")]
    Poisoned,
}
