use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EphemerisError {
    #[error("invalid epoch '{epoch}': {reason}")]
    InvalidEpoch { epoch: String, reason: String },
    #[error("invalid number in {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}
