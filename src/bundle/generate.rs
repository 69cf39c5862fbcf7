//! Executes the bundle generation plan
//!
//! Runs kustomize to capture the aggregated manifest stream, prepends the
//! release manifest when configured, and pipes the result to
//! `operator-sdk generate bundle`. The child processes get an explicit
//! working directory; the tool's own working directory is never changed.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::bundle::plan::{DOCUMENT_SEPARATOR, InvocationPlan, ToolCommand};
use crate::config::GenerateConfig;
use crate::error::{BundleGenError, Result};

/// Run the aggregation and bundle-generation stage
///
/// Blocks until operator-sdk exits; a non-zero exit from either tool is a
/// fatal pipeline error and carries the child's status.
pub fn run(config: &GenerateConfig) -> Result<()> {
    let plan = InvocationPlan::from_config(config);
    std::fs::create_dir_all(&plan.working_dir)?;

    let mut stream = Vec::new();
    if let Some(manifest) = &plan.release_manifest {
        stream.extend_from_slice(&std::fs::read(manifest)?);
        stream.extend_from_slice(DOCUMENT_SEPARATOR);
    }
    stream.extend_from_slice(&capture_stdout(&plan.kustomize, &plan.working_dir)?);

    run_with_stdin(&plan.operator_sdk, &plan.working_dir, &stream)
}

/// Run a tool and capture its stdout; stderr passes through
fn capture_stdout(tool: &ToolCommand, working_dir: &Path) -> Result<Vec<u8>> {
    let output = Command::new(&tool.program)
        .args(&tool.args)
        .current_dir(working_dir)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| BundleGenError::ToolSpawnFailed {
            tool: tool.program.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(BundleGenError::ToolFailed {
            tool: tool.program.clone(),
            status: output.status.code().unwrap_or(1),
        });
    }

    Ok(output.stdout)
}

/// Run a tool with the given bytes piped to its stdin
fn run_with_stdin(tool: &ToolCommand, working_dir: &Path, input: &[u8]) -> Result<()> {
    let mut child = Command::new(&tool.program)
        .args(&tool.args)
        .current_dir(working_dir)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| BundleGenError::ToolSpawnFailed {
            tool: tool.program.clone(),
            reason: e.to_string(),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        // A child that exits before draining stdin surfaces as a broken
        // pipe here; its exit status is the error we want to report.
        if let Err(e) = stdin.write_all(input) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        // Dropping stdin closes the pipe so the child sees EOF
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(BundleGenError::ToolFailed {
            tool: tool.program.clone(),
            status: status.code().unwrap_or(1),
        });
    }

    Ok(())
}
