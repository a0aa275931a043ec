//! Invocation interface and shared types.
//!
//! Defines [`AnalysisInvoker`] along with [`InvocationRequest`],
//! [`InvocationResult`] and [`InvokeError`].

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One run of the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Program to execute, already resolved against the project root.
    pub program: PathBuf,
    /// Argument vector, in order.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub working_directory: PathBuf,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
}

/// Output captured from a program that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Failures that prevent a captured result from being produced.
///
/// A program that starts and exits non-zero is not an error; its status and
/// stderr are part of [`InvocationResult`].
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The program could not be started at all.
    #[error("could not start '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program exceeded its time limit and was killed.
    #[error("analyzer timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Waiting on a started program failed.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// Runs the analyzer and captures its output.
pub trait AnalysisInvoker: Send + Sync {
    fn invoke(
        &self,
        request: InvocationRequest,
    ) -> impl std::future::Future<Output = Result<InvocationResult, InvokeError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
