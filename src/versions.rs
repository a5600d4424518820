//! Version document reader
//!
//! The released versions live in a small JSON document, newest last:
//! `{"versions": ["1.0", "1.1", "2.0"]}`. The current version is always
//! the final entry. The document is maintained by the release process and
//! is read-only here; callers re-read it rather than caching.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};

#[derive(Debug, Deserialize)]
struct VersionDocument {
    versions: Vec<String>,
}

/// Read the version document and return the most recently appended version.
pub fn current_version(path: &Path) -> DeployResult<String> {
    let content = fs::read_to_string(path)?;

    let document: VersionDocument =
        serde_json::from_str(&content).map_err(|e| DeployError::Parse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    document
        .versions
        .last()
        .cloned()
        .ok_or_else(|| DeployError::NoVersions {
            file: path.to_path_buf(),
        })
}
