//! Error types for the task tracker.
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (unknown ID, bad filter, bad argument)
//! - 4: Storage failure (data file unreadable, corrupt or unwritable, or out of IDs)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the `task-cli` binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const STORAGE_FAILED: i32 = 4;
}

/// Failure while reading or writing the data file.
///
/// Each variant names the file and keeps the underlying cause as its source.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main error type for task operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Task with ID {0} not found")]
    NotFound(u64),

    #[error("Invalid filter: {0}. Valid filters are: todo, in-progress, done")]
    InvalidFilter(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No task IDs left to allocate after {0}")]
    IdsExhausted(u64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound(_) | Error::InvalidFilter(_) | Error::InvalidArgument(_) => {
                exit_codes::USER_ERROR
            }
            Error::IdsExhausted(_) | Error::Storage(_) => exit_codes::STORAGE_FAILED,
        }
    }
}

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, Error>;
