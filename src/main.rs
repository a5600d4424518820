//! pasteup-deploy CLI
//!
//! Usage: pasteup-deploy (--full | --version) [--config <path>]
//!
//! Prints the version about to be deployed and waits for a `y` on stdin
//! before doing anything remote. `--version` keeps its historical meaning
//! of a version-pinned deploy, so clap's builtin version flag is disabled.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pasteup_deploy::config::Config;
use pasteup_deploy::deploy::{self, DeployMode};
use pasteup_deploy::versions;

/// Deploy pasteup's built JS, CSS and docs to object storage
#[derive(Parser, Debug)]
#[command(name = "pasteup-deploy")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(group = clap::ArgGroup::new("mode").required(true))]
struct Cli {
    /// Publish the version-pinned paths and the floating "latest" copy
    #[arg(long, group = "mode")]
    full: bool,

    /// Publish the version-pinned paths only
    #[arg(long, group = "mode")]
    version: bool,

    /// Path to a deploy.toml config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref())?;

    let mode = if cli.full {
        DeployMode::Full
    } else {
        DeployMode::VersionOnly
    };

    let stdin = std::io::stdin();
    if !confirm_version(&config, &mut stdin.lock(), &mut std::io::stdout())? {
        return Ok(());
    }

    deploy::run(&config, mode)?;

    Ok(())
}

/// Show the version about to be deployed and wait for confirmation.
/// Only the exact answer `y` (trimmed) proceeds.
fn confirm_version(
    config: &Config,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<bool> {
    let version = versions::current_version(&config.versions_file)?;

    writeln!(output, "You are deploying version: {}", version)?;
    writeln!(output, "Is this the correct version number? (y/n)")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    if answer.trim() == "y" {
        Ok(true)
    } else {
        writeln!(
            output,
            "So update the version number in {}",
            config.versions_file.display()
        )?;
        Ok(false)
    }
}
