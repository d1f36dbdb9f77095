use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed returned status {0}")]
    Status(u16),
    #[error("Feed returned an empty body")]
    Empty,
    #[error("Feed contained no state vectors")]
    NoRecords,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
