//! Error types for the maintenance jobs.

use khabar_core::EntityKind;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can stop a job.
#[derive(Error, Debug)]
pub enum Error {
    /// Content store failure.
    #[error("Store error: {0}")]
    Store(#[from] khabar_core::Error),

    /// No unused short code was found within the retry budget.
    #[error("No free short code for {kind} {id} after {attempts} attempts")]
    CodeSpaceExhausted {
        kind: EntityKind,
        id: Uuid,
        attempts: usize,
    },
}
