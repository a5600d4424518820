//! Staging assembler
//!
//! Builds the local tree every sync job reads from: a fresh directory with
//! copies of the css, js and docs source trees. The docs copy has its
//! `build` and `static` subdirectories stripped - `build` holds the deploy
//! machinery itself and `static` duplicates files already published at the
//! top level. Source trees are never mutated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{DeployError, DeployResult};

/// Subdirectories removed from the staged docs tree after copying.
const STRIPPED_DOCS_SUBDIRS: &[&str] = &["build", "static"];

/// Create the staging directory and populate it from the configured
/// source trees. Fails rather than overwriting an existing directory;
/// an interrupted previous run must be cleaned up by hand.
pub fn assemble(config: &Config) -> DeployResult<PathBuf> {
    let staging = config.staging_dir.clone();

    if let Some(parent) = staging.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir(&staging).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            DeployError::StagingExists {
                path: staging.clone(),
            }
        } else {
            DeployError::Io(e)
        }
    })?;

    // Canonical form so the nesting guard is identity-based; relative or
    // dot-segment config paths must not defeat it.
    let staging_root = staging.canonicalize()?;

    copy_tree(&config.css_dir, &staging.join("css"), &staging_root)?;
    copy_tree(&config.js_dir, &staging.join("js"), &staging_root)?;
    copy_tree(&config.docs_dir, &staging.join("docs"), &staging_root)?;

    for subdir in STRIPPED_DOCS_SUBDIRS {
        let stripped = staging.join("docs").join(subdir);
        match fs::remove_dir_all(&stripped) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DeployError::Io(e)),
        }
    }

    Ok(staging)
}

/// Recursively copy `src` into `dst`, skipping the staging root itself so
/// a docs tree that contains the staging directory never recurses into it.
/// `staging_root` must be canonical; entries are canonicalized before the
/// comparison so spelling differences (`./deploy_tmp` vs `deploy_tmp`)
/// cannot defeat the guard.
fn copy_tree(src: &Path, dst: &Path, staging_root: &Path) -> DeployResult<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        if path.canonicalize().ok().as_deref() == Some(staging_root) {
            continue;
        }

        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&path, &target, staging_root)?;
        } else {
            fs::copy(&path, &target)?;
        }
    }

    Ok(())
}
