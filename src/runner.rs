//! Command runner
//!
//! Executes one rendered sync invocation as a subprocess and forwards its
//! output verbatim. The failure policy reproduces the long-standing deploy
//! script exactly: a failed process is fatal only when it also produced
//! stdout; a failure with empty stdout is reported on stderr and the run
//! continues. When stderr names the sync tool, an install/configure hint
//! is appended so a missing s3cmd is actionable rather than cryptic.

use std::io::{self, Write};
use std::process::Command;

use crate::command::SyncInvocation;
use crate::error::{DeployError, DeployResult};

/// Documentation link shown alongside the missing-tool hint.
const S3CMD_DOCS_URL: &str = "http://s3tools.org/s3cmd";

/// Run one sync invocation to completion, forwarding its output.
///
/// Returns `Err` only on the fatal path (process failed and wrote to
/// stdout). Every other outcome, including a tool that could not be
/// spawned at all, reports to stderr and returns `Ok(())`.
pub fn run_invocation(invocation: &SyncInvocation, tool: &str) -> DeployResult<()> {
    let output = match Command::new(&invocation.program)
        .args(&invocation.args)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            // Spawn failures carry no stdout, so like the historical
            // script they are reported and swallowed.
            let message = format!("{}: {}\n", invocation.program, e);
            forward_stderr(message.as_bytes(), tool);
            return Ok(());
        }
    };

    let failed = !output.status.success();

    if failed && !output.stdout.is_empty() {
        return Err(DeployError::ExternalTool {
            message: format!(
                "`{}` exited with {}: {}",
                invocation.display(),
                output.status,
                String::from_utf8_lossy(&output.stdout).trim()
            ),
        });
    }

    if !output.stdout.is_empty() {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&output.stdout);
        let _ = stdout.flush();
    }

    if !output.stderr.is_empty() {
        forward_stderr(&output.stderr, tool);
    }

    Ok(())
}

fn forward_stderr(content: &[u8], tool: &str) {
    let mut stderr = io::stderr();
    let _ = stderr.write_all(content);

    if String::from_utf8_lossy(content).contains(tool) {
        let _ = writeln!(
            stderr,
            "ERROR: Have you installed and configured {}?",
            tool
        );
        let _ = writeln!(stderr, "{}\n", S3CMD_DOCS_URL);
    }

    let _ = stderr.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_invocation(script: &str) -> SyncInvocation {
        SyncInvocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[test]
    fn successful_run_is_ok() {
        let invocation = shell_invocation("exit 0");
        assert!(run_invocation(&invocation, "s3cmd").is_ok());
    }

    #[test]
    fn fatal_only_when_failed_and_stdout_present() {
        // Quirk preserved from the original policy: failure alone is not
        // fatal, failure plus stdout is.
        let invocation = shell_invocation("echo partial upload; exit 1");
        let err = run_invocation(&invocation, "s3cmd").unwrap_err();
        assert!(matches!(err, DeployError::ExternalTool { .. }));
        assert!(err.to_string().contains("partial upload"));
        // The fatal message carries the rendered command line.
        assert!(err.to_string().contains("`sh -c"));
    }

    #[test]
    fn failure_without_stdout_is_swallowed() {
        // Quirk preserved: a nonzero exit with empty stdout continues the
        // run, even when stderr reported a real failure.
        let invocation = shell_invocation("echo access denied >&2; exit 1");
        assert!(run_invocation(&invocation, "s3cmd").is_ok());
    }

    #[test]
    fn success_with_output_is_ok() {
        let invocation = shell_invocation("echo synced 12 files");
        assert!(run_invocation(&invocation, "s3cmd").is_ok());
    }

    #[test]
    fn missing_program_is_swallowed() {
        let invocation = SyncInvocation {
            program: "definitely-not-a-real-sync-tool".to_string(),
            args: vec!["sync".to_string()],
        };
        assert!(run_invocation(&invocation, "s3cmd").is_ok());
    }
}
