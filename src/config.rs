//! Configuration module for pasteup-deploy
//!
//! Configuration hierarchy:
//! 1. Environment variables (PASTEUP_*)
//! 2. Project config (deploy.toml, or the path given with --config)
//! 3. Built-in defaults (lowest priority)
//!
//! The defaults reproduce the historical deploy script: bucket `pasteup`,
//! staging under `deploy_tmp`, sources beneath `static/`, version document
//! at `versions`, synced with `s3cmd`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Object-storage bucket the assets are published to
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Local staging directory assembled before any sync runs
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Source tree containing the built CSS
    #[serde(default = "default_css_dir")]
    pub css_dir: PathBuf,

    /// Source tree containing the built JS
    #[serde(default = "default_js_dir")]
    pub js_dir: PathBuf,

    /// Documentation tree (published whole on a full deploy)
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// JSON document listing released versions, newest last
    #[serde(default = "default_versions_file")]
    pub versions_file: PathBuf,

    /// External sync tool invoked per job
    #[serde(default = "default_sync_tool")]
    pub sync_tool: String,
}

fn default_bucket() -> String {
    "pasteup".to_string()
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("deploy_tmp")
}

fn default_css_dir() -> PathBuf {
    PathBuf::from("static/css")
}

fn default_js_dir() -> PathBuf {
    PathBuf::from("static/js")
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_versions_file() -> PathBuf {
    PathBuf::from("versions")
}

fn default_sync_tool() -> String {
    "s3cmd".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            staging_dir: default_staging_dir(),
            css_dir: default_css_dir(),
            js_dir: default_js_dir(),
            docs_dir: default_docs_dir(),
            versions_file: default_versions_file(),
            sync_tool: default_sync_tool(),
        }
    }
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DeployResult<Self> {
        let (config, _warnings) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys).
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| DeployError::Parse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|key| ConfigWarning {
                key,
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load from an explicit config path, from deploy.toml, or defaults
    pub fn load_or_default(explicit: Option<&Path>) -> DeployResult<Self> {
        if let Some(path) = explicit {
            return Ok(Self::load(path)?.with_env_overrides());
        }

        let project_config = Path::new("deploy.toml");
        if project_config.exists() {
            return Ok(Self::load(project_config)?.with_env_overrides());
        }

        Ok(Self::default().with_env_overrides())
    }

    /// Apply environment variable overrides (PASTEUP_* prefix)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(bucket) = std::env::var("PASTEUP_BUCKET") {
            if !bucket.is_empty() {
                self.bucket = bucket;
            }
        }

        if let Ok(dir) = std::env::var("PASTEUP_STAGING_DIR") {
            if !dir.is_empty() {
                self.staging_dir = PathBuf::from(dir);
            }
        }

        if let Ok(tool) = std::env::var("PASTEUP_SYNC_TOOL") {
            if !tool.is_empty() {
                self.sync_tool = tool;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.bucket, "pasteup");
        assert_eq!(config.staging_dir, PathBuf::from("deploy_tmp"));
        assert_eq!(config.css_dir, PathBuf::from("static/css"));
        assert_eq!(config.js_dir, PathBuf::from("static/js"));
        assert_eq!(config.versions_file, PathBuf::from("versions"));
        assert_eq!(config.sync_tool, "s3cmd");
    }

    #[test]
    fn test_config_parse_toml() {
        let toml = r#"
bucket = "pasteup-staging"
staging_dir = "/tmp/deploy"
sync_tool = "aws"
"#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.bucket, "pasteup-staging");
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/deploy"));
        assert_eq!(config.sync_tool, "aws");
        // Unset keys fall back to defaults.
        assert_eq!(config.versions_file, PathBuf::from("versions"));
    }

    #[test]
    fn test_config_load_with_warnings_reports_unknown_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deploy.toml");

        fs::write(&path, "buckett = \"oops\"\n").unwrap();

        let (_config, warnings) = Config::load_with_warnings(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "buckett");
        assert_eq!(warnings[0].file, path);
    }

    #[test]
    fn test_config_load_malformed_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deploy.toml");

        fs::write(&path, "bucket = [unclosed\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, DeployError::Parse { .. }));
    }

    #[test]
    fn test_env_override_bucket() {
        // SAFETY: Single-threaded test, no concurrent access to env vars
        unsafe { std::env::set_var("PASTEUP_BUCKET", "pasteup-test") };
        let config = Config::default().with_env_overrides();
        assert_eq!(config.bucket, "pasteup-test");
        unsafe { std::env::remove_var("PASTEUP_BUCKET") };
    }

    #[test]
    fn test_env_override_sync_tool() {
        // SAFETY: Single-threaded test, no concurrent access to env vars
        unsafe { std::env::set_var("PASTEUP_SYNC_TOOL", "s5cmd") };
        let config = Config::default().with_env_overrides();
        assert_eq!(config.sync_tool, "s5cmd");
        unsafe { std::env::remove_var("PASTEUP_SYNC_TOOL") };
    }
}
