//! Error types for the harness.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a test case, or the whole run, from executing.
///
/// A generator exiting with a nonzero code is not an error: it is recorded
/// in its [`GenerationResult`](crate::process::GenerationResult).
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The inputs root could not be listed.
    #[error("failed to discover test cases in {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Preparing or reading a case's files failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A case name that is not a single plain path component.
    #[error("invalid test case name '{0}': must be a single path component")]
    InvalidCaseKey(String),

    /// The harness configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
