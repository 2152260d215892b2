//! One tool invocation and its paired diagnostic stream
//!
//! A [`ProcessContext`] owns at most one child process at a time. Standard
//! output and standard error are drained by background tasks from the moment
//! the child is spawned, so a large payload on stdin can never deadlock
//! against a full output pipe. Completion is only reported once the child has
//! exited *and* both streams have reached end-of-data, which guarantees the
//! captured output is complete.
//!
//! A run limit set with [`ProcessContext::with_timeout`] is armed when the
//! child is spawned and bounds writing input as well as waiting for exit.

use super::{TerminalStatus, ToolArgs};
use crate::error::{SmimeError, SmimeResult};
use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

type Collector = JoinHandle<io::Result<Vec<u8>>>;
type Deadline = (Instant, Duration);

/// Owner of a single tool subprocess and the output it produced
pub struct ProcessContext {
    program: PathBuf,
    leading_args: Vec<String>,
    timeout: Option<Duration>,
    deadline: Option<Deadline>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<Collector>,
    stderr: Option<Collector>,
    status: Option<TerminalStatus>,
    output: Zeroizing<Vec<u8>>,
    diagnostic: String,
}

impl ProcessContext {
    /// Context bound to `program`; nothing is spawned yet
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout: None,
            deadline: None,
            child: None,
            stdin: None,
            stdout: None,
            stderr: None,
            status: None,
            output: Zeroizing::new(Vec::new()),
            diagnostic: String::new(),
        }
    }

    /// Arguments placed before every invocation's own arguments
    #[must_use]
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    /// Limit for a whole run, counted from the spawn
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the child process is still active
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            // A status query failure leaves the child's state unknown, so it
            // is treated as still running.
            Some(child) => !matches!(child.try_wait(), Ok(Some(_))),
            None => false,
        }
    }

    /// Spawn the program with `args`
    ///
    /// Must be called from within a Tokio runtime. Leftovers of a previous,
    /// already terminated run are released first.
    pub fn start(&mut self, args: &ToolArgs) -> SmimeResult<()> {
        if self.is_running() {
            return Err(SmimeError::AlreadyRunning);
        }
        self.reset();

        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(args.iter())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| SmimeError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        drop(command);

        self.deadline = self.timeout.map(|limit| (Instant::now() + limit, limit));
        self.stdin = child.stdin.take();
        self.stdout = child.stdout.take().map(collect);
        self.stderr = child.stderr.take().map(collect);

        debug!(
            program = %self.program.display(),
            pid = ?child.id(),
            args = args.len(),
            "Started tool process"
        );
        self.child = Some(child);
        Ok(())
    }

    /// Write `data` to the child's standard input
    ///
    /// A child that stops reading cannot stall this past the run limit: at
    /// the deadline it is killed and [`SmimeError::Timeout`] is returned.
    pub async fn write_input(&mut self, data: &[u8]) -> SmimeResult<()> {
        if self.child.is_none() {
            return Err(SmimeError::NotStarted);
        }
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            SmimeError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "tool input already closed",
            ))
        })?;

        let written = within(self.deadline, async {
            stdin.write_all(data).await?;
            stdin.flush().await
        })
        .await;
        match written {
            Ok(result) => Ok(result?),
            Err(limit) => Err(self.expire(limit).await),
        }
    }

    /// Signal end-of-input to the child
    pub fn close_input(&mut self) {
        drop(self.stdin.take());
    }

    /// Wait until the child terminates and all of its output has been read
    ///
    /// With a `timeout`, or a run limit armed at spawn, a child still running
    /// at the earlier deadline is killed and [`SmimeError::Timeout`] is
    /// returned.
    pub async fn wait_for_completion(
        &mut self,
        timeout: Option<Duration>,
    ) -> SmimeResult<TerminalStatus> {
        self.close_input();
        let requested = timeout.map(|limit| (Instant::now() + limit, limit));
        let deadline = match (self.deadline, requested) {
            (Some(armed), Some(asked)) => Some(if asked.0 < armed.0 { asked } else { armed }),
            (armed, asked) => armed.or(asked),
        };

        let child = self.child.as_mut().ok_or(SmimeError::NotStarted)?;
        let waited = within(deadline, child.wait()).await;
        let status = match waited {
            Ok(exit) => TerminalStatus::from(exit?),
            Err(limit) => return Err(self.expire(limit).await),
        };

        // Output delivery can trail process exit: read both streams to EOF.
        let drained = within(deadline, drain(&mut self.stdout)).await;
        let output = match drained {
            Ok(output) => Zeroizing::new(output?),
            Err(limit) => return Err(self.expire(limit).await),
        };
        let drained = within(deadline, drain(&mut self.stderr)).await;
        let diagnostic = match drained {
            Ok(diagnostic) => diagnostic?,
            Err(limit) => return Err(self.expire(limit).await),
        };

        self.output = output;
        self.diagnostic = String::from_utf8_lossy(&diagnostic).into_owned();
        self.status = Some(status);

        debug!(
            program = %self.program.display(),
            %status,
            output_len = self.output.len(),
            "Tool process finished"
        );
        Ok(status)
    }

    /// Terminal status of the last completed run
    pub fn status(&self) -> Option<TerminalStatus> {
        self.status
    }

    /// Standard output of the last completed run
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Move the captured standard output out of the context
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut *self.output)
    }

    /// Standard error of the last completed run
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// Release the child, its streams and every captured buffer
    ///
    /// A still-running child is killed. Safe to call on a context that never
    /// started anything.
    pub fn reset(&mut self) {
        self.stdin = None;

        if let Some(mut child) = self.child.take() {
            if !matches!(child.try_wait(), Ok(Some(_))) {
                if let Err(e) = child.start_kill() {
                    warn!(
                        program = %self.program.display(),
                        error = %e,
                        "Failed to kill tool process during reset"
                    );
                }
            }
        }

        for collector in [self.stdout.take(), self.stderr.take()].into_iter().flatten() {
            collector.abort();
        }

        self.deadline = None;
        self.status = None;
        self.output.zeroize();
        self.diagnostic.zeroize();
    }

    async fn expire(&mut self, limit: Duration) -> SmimeError {
        warn!(
            program = %self.program.display(),
            timeout = ?limit,
            "Tool did not finish in time, killing it"
        );
        // Expiry while draining output finds the child already reaped
        if self.is_running() {
            if let Some(child) = self.child.as_mut() {
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed-out tool process");
                }
            }
        }
        self.reset();
        SmimeError::Timeout(limit)
    }
}

impl Drop for ProcessContext {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for ProcessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessContext")
            .field("program", &self.program)
            .field("leading_args", &self.leading_args)
            .field("timeout", &self.timeout)
            .field("started", &self.child.is_some())
            .field("status", &self.status)
            .field("output_len", &self.output.len())
            .finish()
    }
}

fn collect<R>(mut stream: R) -> Collector
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).await?;
        Ok(buffer)
    })
}

async fn drain(collector: &mut Option<Collector>) -> SmimeResult<Vec<u8>> {
    let Some(handle) = collector.as_mut() else {
        return Ok(Vec::new());
    };
    let joined = handle.await;
    *collector = None;
    let collected = joined.map_err(|e| SmimeError::Io(io::Error::other(e)))?;
    Ok(collected?)
}

async fn within<F: Future>(
    deadline: Option<Deadline>,
    future: F,
) -> Result<F::Output, Duration> {
    match deadline {
        Some((at, limit)) => tokio::time::timeout_at(at, future)
            .await
            .map_err(|_| limit),
        None => Ok(future.await),
    }
}
