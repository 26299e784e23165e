//! Error taxonomy for compilation database generation.
//!
//! Every failure the pipeline can hit is a [`CompdbError`]. Some kinds only
//! reduce the completeness of the output (a single metadata file or driver
//! source is skipped); those are handed to the [`Reporter`](crate::report::Reporter)
//! as diagnostics. The rest abort the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompdbError {
    /// The scan root or a driver directory does not exist or cannot be read.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No `*.o.cmd` files under the scan root.
    #[error("No metadata files found under {}", .0.display())]
    NoMetadataFiles(PathBuf),

    /// A `source_<key>` line with no matching `cmd_<key>` line.
    #[error("{}: no command recorded for '{key}'", .file.display())]
    MissingCommandForSource { file: PathBuf, key: String },

    #[error("Failed to read directory {}: {source}", .path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read metadata file {}: {source}", .path.display())]
    UnreadableMetadataFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A driver directory candidate that does not include any kernel header.
    #[error("{} seems not a device driver source, skipping", .0.display())]
    NotADriverSource(PathBuf),

    #[error("Failed to read driver source {}: {source}", .path.display())]
    UnreadableDriverSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing was parsed, so there is no command to clone for drivers.
    #[error("Compilation database is empty, no entry to use as a driver command template")]
    EmptyCompilationDatabase,

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize compilation database: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompdbError {
    /// Whether this error aborts the whole run. Non-fatal kinds are reported
    /// as diagnostics and the offending item is skipped.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CompdbError::MissingCommandForSource { .. }
                | CompdbError::UnreadableDirectory { .. }
                | CompdbError::UnreadableMetadataFile { .. }
                | CompdbError::NotADriverSource(_)
                | CompdbError::UnreadableDriverSource { .. }
        )
    }
}

pub type Result<T, E = CompdbError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds_are_not_fatal() {
        let missing = CompdbError::MissingCommandForSource {
            file: PathBuf::from(".foo.o.cmd"),
            key: "foo.o".to_string(),
        };
        assert!(!missing.is_fatal());
        assert!(!CompdbError::NotADriverSource(PathBuf::from("other.c")).is_fatal());
    }

    #[test]
    fn test_run_aborting_kinds_are_fatal() {
        assert!(CompdbError::NoMetadataFiles(PathBuf::from("/out")).is_fatal());
        assert!(CompdbError::EmptyCompilationDatabase.is_fatal());
        assert!(CompdbError::DirectoryNotFound(PathBuf::from("/nope")).is_fatal());
    }

    #[test]
    fn test_messages_name_the_item() {
        let err = CompdbError::NotADriverSource(PathBuf::from("drv/other.c"));
        assert!(err.to_string().contains("drv/other.c"));

        let err = CompdbError::MissingCommandForSource {
            file: PathBuf::from(".bar.o.cmd"),
            key: "bar.o".to_string(),
        };
        assert!(err.to_string().contains("'bar.o'"));
    }
}
