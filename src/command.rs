//! Sync command builder
//!
//! Renders one sync job as a structured argument list for the external
//! sync tool. An argument vector (rather than a template shell string)
//! sidesteps shell-escaping entirely. Pure: no I/O, fails only on
//! malformed inputs.
//!
//! The fixed surface, matching s3cmd:
//! `sync --recursive --acl-public --guess-mime-type
//!  [--add-header "Cache-Control: max-age=60"] [--mime-type <mime>]
//!  --add-header "Expires: <date>" <localDir> s3://<bucket><prefix>`

use std::path::PathBuf;

use crate::error::{DeployError, DeployResult};

/// Cache-control header attached to cache-safe jobs, so version-pointer
/// artifacts propagate within a minute of a deploy.
const SAFE_CACHE_HEADER: &str = "Cache-Control: max-age=60";

/// One sync operation: a local directory pushed to a remote path prefix
/// with a fixed expiry header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    /// Local directory (or single file) to sync
    pub directory: PathBuf,
    /// Remote path prefix, e.g. `/2.0/` or `/`
    pub remote_prefix: String,
    /// Pre-formatted HTTP-date for the Expires header
    pub expiry: String,
    /// Explicit MIME type, overriding auto-detection
    pub mime_type: Option<String>,
    /// Attach the short max-age cache-control header
    pub cache_safe: bool,
}

/// A fully rendered sync invocation, ready for the command runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl SyncInvocation {
    /// Single-line rendering for messages; the runner never shells this out.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Render a sync job into an invocation of the external tool.
pub fn build_invocation(tool: &str, bucket: &str, job: &SyncJob) -> DeployResult<SyncInvocation> {
    if job.directory.as_os_str().is_empty() {
        return Err(DeployError::Validation {
            message: "empty source directory".to_string(),
        });
    }
    if job.remote_prefix.is_empty() {
        return Err(DeployError::Validation {
            message: "empty remote path prefix".to_string(),
        });
    }

    let mut args = vec![
        "sync".to_string(),
        "--recursive".to_string(),
        "--acl-public".to_string(),
        "--guess-mime-type".to_string(),
    ];

    if job.cache_safe {
        args.push("--add-header".to_string());
        args.push(SAFE_CACHE_HEADER.to_string());
    }

    if let Some(mime) = &job.mime_type {
        args.push("--mime-type".to_string());
        args.push(mime.clone());
    }

    args.push("--add-header".to_string());
    args.push(format!("Expires: {}", job.expiry));

    args.push(job.directory.display().to_string());
    args.push(format!("s3://{}{}", bucket, job.remote_prefix));

    Ok(SyncInvocation {
        program: tool.to_string(),
        args,
    })
}
