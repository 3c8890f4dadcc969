//! # CLI Error Type
//!
//! Everything that can stop a run.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Script command fails                                                   │
//! │         │                                                               │
//! │         ├── rejection (duplicate value, option limit, ...)             │
//! │         │      → warn!, form unchanged, continue with next command     │
//! │         │                                                               │
//! │         └── precondition violation (bad index, unknown variant key)    │
//! │                → CliError::Command, run aborts, exit code 1            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use bazaar_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Unknown flag or missing flag value.
    #[error("Invalid arguments: {0}")]
    Usage(String),

    /// Reading an input file failed.
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its shape.
    #[error("Cannot parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A script command hit a precondition violation.
    #[error("Command #{position} ({command}) failed: {source}")]
    Command {
        position: usize,
        command: String,
        #[source]
        source: CoreError,
    },

    /// Loading the record or encoding output failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Cannot write output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_message() {
        let err = CliError::Command {
            position: 3,
            command: "removeValue".to_string(),
            source: CoreError::OptionIndexOutOfRange { index: 4, len: 2 },
        };
        assert_eq!(
            err.to_string(),
            "Command #3 (removeValue) failed: Option index 4 out of range (have 2 options)"
        );
    }
}
