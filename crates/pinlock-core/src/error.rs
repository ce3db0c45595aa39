//! Error types for the pinlock library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PinLockError>;

#[derive(Error, Debug)]
pub enum PinLockError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures reported by a [`PinStore`](crate::store::PinStore) backend.
///
/// The flow controller never treats these as a wrong PIN; they surface as a
/// distinct "verification unavailable" outcome that does not count an attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
