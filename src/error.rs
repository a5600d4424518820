//! Error types for pasteup-deploy
//!
//! Uses `thiserror` for library errors; the binary boundary wraps these
//! in `anyhow::Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Bad job parameters handed to the command builder
    #[error("invalid sync job: {message}")]
    Validation { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed version document
    #[error("malformed version document {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// Version document parsed but lists no versions
    #[error("no versions recorded in {file}")]
    NoVersions { file: PathBuf },

    /// Staging directory already present - refuse to overwrite
    #[error("staging directory already exists: {path} - remove it and retry")]
    StagingExists { path: PathBuf },

    /// Fatal failure reported by the external sync tool
    #[error("sync tool failed: {message}")]
    ExternalTool { message: String },
}
