//! Error Types
//!
//! Typed errors for attribution parsing and for the collaborators that supply
//! attribution text. Aggregation and ranking are total and have no error type.

use thiserror::Error;

/// Errors surfaced while turning one file's attribution into ledger entries
#[derive(Debug, Error)]
pub enum FameError {
    /// A header line did not have the four-field shape where one was required
    #[error("Malformed attribution record in {file} at line {line_number}: {line:?}")]
    MalformedRecord {
        file: String,
        line_number: usize,
        line: String,
    },

    /// The line-count field of a header is not a non-negative integer
    #[error("Invalid line count {value:?} in {file} at line {line_number}")]
    InvalidLineCount {
        file: String,
        line_number: usize,
        value: String,
    },

    /// The attribution source failed for this file
    #[error("Failed to read attribution for {file}: {source}")]
    Source {
        file: String,
        #[source]
        source: SourceError,
    },
}

impl FameError {
    /// Create a malformed record error
    pub fn malformed(file: &str, line_number: usize, line: &str) -> Self {
        Self::MalformedRecord {
            file: file.to_string(),
            line_number,
            line: line.to_string(),
        }
    }

    /// Create an invalid line count error
    pub fn invalid_line_count(file: &str, line_number: usize, value: &str) -> Self {
        Self::InvalidLineCount {
            file: file.to_string(),
            line_number,
            value: value.to_string(),
        }
    }

    /// Wrap a source failure with the file it happened on
    pub fn from_source(file: &str, source: SourceError) -> Self {
        Self::Source {
            file: file.to_string(),
            source,
        }
    }

    /// The file this error belongs to
    pub fn file(&self) -> &str {
        match self {
            Self::MalformedRecord { file, .. }
            | Self::InvalidLineCount { file, .. }
            | Self::Source { file, .. } => file,
        }
    }
}

/// Errors from the external collaborators (file listing, blame, last change)
#[derive(Debug, Error)]
pub enum SourceError {
    /// libgit2 failure
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Spawning or reading a subprocess failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A git subprocess exited unsuccessfully
    #[error("'{command}' exited with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// The requested revision could not be resolved to a tree
    #[error("Cannot resolve revision '{revision}': {reason}")]
    Revision { revision: String, reason: String },
}

/// Result type for core attribution operations
pub type FameResult<T> = Result<T, FameError>;
