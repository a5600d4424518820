//! Deploy orchestrator
//!
//! Plans the job set for a deploy mode, assembles staging, fans the jobs
//! out to the command runner on independent threads, and tears staging
//! down once every job has finished. Planning is pure so the job matrix
//! is testable without touching the filesystem or the sync tool.
//!
//! Job matrix:
//! - always: js and css to `/{version}/` (far-future expiry - the content
//!   is immutable once published under a version), and the version
//!   document to `/` (near-future expiry, explicit JSON MIME type);
//! - full deploys additionally republish docs, js and css to `/` as the
//!   floating "latest" copy, all with near-future expiry.

use std::path::Path;
use std::thread;

use chrono::{DateTime, Utc};

use crate::command::{build_invocation, SyncInvocation, SyncJob};
use crate::config::Config;
use crate::error::DeployResult;
use crate::expiry::{far_future_expiry, near_future_expiry};
use crate::runner::run_invocation;
use crate::staging;
use crate::versions;

/// Which job set a run generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    /// Version-pinned paths plus the floating "latest" copy at the root
    Full,
    /// Version-pinned paths and the version document only
    VersionOnly,
}

/// Plan the sync jobs for one run. Pure function of its inputs; `now`
/// feeds the expiry headers and is injected for testability.
pub fn plan_jobs(
    config: &Config,
    mode: DeployMode,
    version: &str,
    staging_dir: &Path,
    now: DateTime<Utc>,
) -> Vec<SyncJob> {
    let versioned_prefix = format!("/{}/", version);
    let far = far_future_expiry(now);
    let near = near_future_expiry(now);

    let mut jobs = vec![
        SyncJob {
            directory: staging_dir.join("js"),
            remote_prefix: versioned_prefix.clone(),
            expiry: far.clone(),
            mime_type: None,
            cache_safe: true,
        },
        SyncJob {
            directory: staging_dir.join("css"),
            remote_prefix: versioned_prefix,
            expiry: far,
            mime_type: None,
            cache_safe: true,
        },
        SyncJob {
            directory: config.versions_file.clone(),
            remote_prefix: "/".to_string(),
            expiry: near.clone(),
            mime_type: Some("application/json".to_string()),
            cache_safe: true,
        },
    ];

    if mode == DeployMode::Full {
        jobs.push(SyncJob {
            directory: staging_dir.join("docs"),
            remote_prefix: "/".to_string(),
            expiry: near.clone(),
            mime_type: None,
            cache_safe: true,
        });
        jobs.push(SyncJob {
            directory: staging_dir.join("js"),
            remote_prefix: "/".to_string(),
            expiry: near.clone(),
            mime_type: None,
            cache_safe: true,
        });
        jobs.push(SyncJob {
            directory: staging_dir.join("css"),
            remote_prefix: "/".to_string(),
            expiry: near,
            mime_type: None,
            cache_safe: true,
        });
    }

    jobs
}

/// Execute a deploy run end to end.
///
/// Every invocation is built before any is dispatched, so a validation
/// error aborts with nothing sent. Jobs then run concurrently; a fatal
/// job error does not stop its siblings, and staging teardown happens
/// whether or not anything failed. The first fatal error, if any, is
/// returned after teardown.
pub fn run(config: &Config, mode: DeployMode) -> DeployResult<()> {
    let version = versions::current_version(&config.versions_file)?;
    let staging_dir = staging::assemble(config)?;

    let result = dispatch(config, mode, &version, &staging_dir);

    // Teardown runs unconditionally; a teardown failure only surfaces
    // when the jobs themselves succeeded.
    let teardown = std::fs::remove_dir_all(&staging_dir);
    result?;
    teardown?;

    Ok(())
}

fn dispatch(
    config: &Config,
    mode: DeployMode,
    version: &str,
    staging_dir: &Path,
) -> DeployResult<()> {
    let jobs = plan_jobs(config, mode, version, staging_dir, Utc::now());

    let invocations: Vec<SyncInvocation> = jobs
        .iter()
        .map(|job| build_invocation(&config.sync_tool, &config.bucket, job))
        .collect::<DeployResult<_>>()?;

    // Fan-out/fan-in: one thread per job, scope join as the barrier.
    let mut results: Vec<DeployResult<()>> = Vec::with_capacity(invocations.len());
    thread::scope(|scope| {
        let handles: Vec<_> = invocations
            .iter()
            .map(|invocation| scope.spawn(move || run_invocation(invocation, &config.sync_tool)))
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(result) => results.push(result),
                Err(_) => results.push(Err(crate::error::DeployError::ExternalTool {
                    message: "sync job panicked".to_string(),
                })),
            }
        }
    });

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn plan(mode: DeployMode) -> Vec<SyncJob> {
        let config = Config::default();
        plan_jobs(&config, mode, "2.0", Path::new("deploy_tmp"), fixed_now())
    }

    #[test]
    fn version_only_plans_exactly_three_jobs() {
        assert_eq!(plan(DeployMode::VersionOnly).len(), 3);
    }

    #[test]
    fn full_plans_exactly_six_jobs() {
        assert_eq!(plan(DeployMode::Full).len(), 6);
    }

    #[test]
    fn version_pinned_assets_get_far_future_expiry() {
        for mode in [DeployMode::VersionOnly, DeployMode::Full] {
            let jobs = plan(mode);
            let far = far_future_expiry(fixed_now());

            for dir in ["js", "css"] {
                let job = jobs
                    .iter()
                    .find(|j| {
                        j.directory == PathBuf::from("deploy_tmp").join(dir)
                            && j.remote_prefix == "/2.0/"
                    })
                    .unwrap();
                assert_eq!(job.expiry, far);
                assert!(job.cache_safe);
                assert_eq!(job.mime_type, None);
            }
        }
    }

    #[test]
    fn version_document_job_targets_root_as_json() {
        let jobs = plan(DeployMode::VersionOnly);
        let job = jobs
            .iter()
            .find(|j| j.directory == PathBuf::from("versions"))
            .unwrap();

        assert_eq!(job.remote_prefix, "/");
        assert_eq!(job.expiry, near_future_expiry(fixed_now()));
        assert_eq!(job.mime_type.as_deref(), Some("application/json"));
        assert!(job.cache_safe);
    }

    #[test]
    fn full_mode_republishes_latest_at_root() {
        let jobs = plan(DeployMode::Full);
        let near = near_future_expiry(fixed_now());

        for dir in ["docs", "js", "css"] {
            let job = jobs
                .iter()
                .find(|j| {
                    j.directory == PathBuf::from("deploy_tmp").join(dir) && j.remote_prefix == "/"
                })
                .unwrap();
            assert_eq!(job.expiry, near);
            assert!(job.cache_safe);
            assert_eq!(job.mime_type, None);
        }
    }

    #[test]
    fn version_only_never_targets_latest_asset_paths() {
        let jobs = plan(DeployMode::VersionOnly);
        assert!(jobs
            .iter()
            .all(|j| j.remote_prefix != "/" || j.directory == PathBuf::from("versions")));
    }
}
