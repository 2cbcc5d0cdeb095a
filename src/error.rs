use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils::constants::{EXIT_BAD_ARGUMENTS, EXIT_FAILURE, EXIT_MALFORMED_INPUT};

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open input file {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot map file window at offset {offset}: {source}")]
    Mapping {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Broken format in input file at offset {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    #[error("Invalid measurement '{value}' at offset {offset}")]
    Parse { offset: u64, value: String },

    #[error("Cannot find start of partition: no line terminator after offset {offset}")]
    BoundaryScan { offset: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Collation error: {0}")]
    Collation(String),

    #[error("Data merge error: {0}")]
    DataMerge(String),

    #[error("{} partition(s) failed, {} succeeded with {} records", .failures.len(), .succeeded, .records)]
    PartitionsFailed {
        failures: Vec<PartitionFailure>,
        succeeded: usize,
        records: u64,
    },
}

impl ProcessingError {
    /// True when the error points at bad input data rather than the environment.
    pub fn is_malformed_input(&self) -> bool {
        match self {
            ProcessingError::MalformedRecord { .. }
            | ProcessingError::Parse { .. }
            | ProcessingError::BoundaryScan { .. } => true,
            ProcessingError::PartitionsFailed { failures, .. } => {
                failures.iter().any(|f| f.error.is_malformed_input())
            }
            _ => false,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_malformed_input() {
            return EXIT_MALFORMED_INPUT;
        }

        match self {
            ProcessingError::Config(_)
            | ProcessingError::ConfigSource(_)
            | ProcessingError::Validation(_)
            | ProcessingError::Collation(_) => EXIT_BAD_ARGUMENTS,
            _ => EXIT_FAILURE,
        }
    }
}

/// Error raised by a single partition's worker.
#[derive(Debug)]
pub struct PartitionFailure {
    pub partition: usize,
    pub error: ProcessingError,
}

impl fmt::Display for PartitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partition {:02}: {}", self.partition, self.error)
    }
}
