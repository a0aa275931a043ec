//! Runs the analyzer binary directly (not through a shell).
//!
//! The program path is not checked beforehand: a missing or non-executable
//! binary surfaces as [`InvokeError::Launch`] from the spawn itself.

use super::executor::{AnalysisInvoker, InvocationRequest, InvocationResult, InvokeError};
use super::subprocess;

/// Invoker backed by a real child process.
pub struct ProcessInvoker;

impl AnalysisInvoker for ProcessInvoker {
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResult, InvokeError> {
        let mut cmd = tokio::process::Command::new(&request.program);
        cmd.args(&request.args).current_dir(&request.working_directory);
        subprocess::run_command(&mut cmd, request.timeout).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
