//! Error types for the batch crate.

use grain_common::{ErrorKind, GrainError};
use thiserror::Error;

use crate::pool::PoolError;

/// Errors that stop a batch before any job runs.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Grain(#[from] GrainError),

    #[error("Worker pool: {0}")]
    Pool(#[from] PoolError),
}

impl BatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BatchError::Grain(e) => e.kind(),
            BatchError::Pool(_) => ErrorKind::Resource,
        }
    }
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;
