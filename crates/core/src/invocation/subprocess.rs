//! Subprocess management.
//!
//! [`run_command`] spawns a prepared [`tokio::process::Command`], captures
//! stdout/stderr and enforces the time limit.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::executor::{InvocationResult, InvokeError};

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Spawn `cmd`, wait up to `timeout` for it to exit, and capture its output.
///
/// The caller sets program, arguments and working directory. Stdin is closed.
pub async fn run_command(
    cmd: &mut Command,
    timeout: Duration,
) -> Result<InvocationResult, InvokeError> {
    // `kill_on_drop(true)` ensures the child is killed when dropped (e.g. on timeout).
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|source| InvokeError::Launch {
        program: cmd.as_std().get_program().to_string_lossy().into_owned(),
        source,
    })?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
    let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            let stdout_bytes = stdout_task.await.unwrap_or_default();
            let stderr_bytes = stderr_task.await.unwrap_or_default();

            Ok(InvocationResult {
                stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
                exit_code: status.code(),
                duration_ms,
            })
        }
        Ok(Err(e)) => Err(InvokeError::Io(e)),
        Err(_elapsed) => {
            // `child` is dropped on return, which kills it.
            stdout_task.abort();
            stderr_task.abort();
            Err(InvokeError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.take(MAX_OUTPUT_BYTES as u64).read_to_end(&mut buf).await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
