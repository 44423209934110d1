//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::ChildStdout;
use tokio::sync::mpsc;
use tracing::trace;

use crate::application::ports::CommandRunner;

/// Stdout lines buffered between the reader task and the collector.
const STREAM_CAPACITY: usize = 64;

/// Production `CommandRunner`. Uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// Stdout is streamed line by line through a bounded channel while the child
/// runs, and stderr is drained alongside it, so a chatty child never blocks
/// on a full pipe. On timeout the child is killed explicitly; `kill_on_drop`
/// covers callers that drop the future mid-command.
///
/// Every call carries its own budget; the runner holds no default timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        trace!(program = %program, args = ?args, "spawning");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout_handle = child
            .stdout
            .take()
            .with_context(|| format!("{program} stdout was not captured"))?;
        let mut stderr_handle = child.stderr.take();

        let (tx, mut rx) = mpsc::channel(STREAM_CAPACITY);
        let reader = tokio::spawn(forward_lines(stdout_handle, tx));

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        // Ends once the reader task hits EOF and drops its sender.
                        while let Some(line) = rx.recv().await {
                            trace!(
                                program = %program,
                                line = %String::from_utf8_lossy(&line).trim_end(),
                                "stdout"
                            );
                            buf.extend_from_slice(&line);
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                reader.abort();
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {timeout:?}")
            }
        }
    }
}

/// Send each stdout line (newline included) until EOF or the receiver is gone.
async fn forward_lines(stdout: ChildStdout, tx: mpsc::Sender<Vec<u8>>) {
    let mut reader = BufReader::new(stdout);
    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        }
    }
}
