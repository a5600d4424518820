//! pasteup-deploy - publishes pasteup's built assets to object storage
//!
//! A deploy copies the css, js and docs trees into a local staging
//! directory, then mirrors them to the bucket with per-category cache
//! expiry headers: version-pinned paths are immutable and cached for ten
//! years, the version document and "latest" root copy expire within a
//! minute so clients pick up new releases quickly.

pub mod command;
pub mod config;
pub mod deploy;
pub mod error;
pub mod expiry;
pub mod runner;
pub mod staging;
pub mod versions;

// Re-exports for convenience
pub use command::{build_invocation, SyncInvocation, SyncJob};
pub use config::Config;
pub use deploy::{plan_jobs, DeployMode};
pub use error::{DeployError, DeployResult};
pub use expiry::{far_future_expiry, near_future_expiry};
pub use versions::current_version;
