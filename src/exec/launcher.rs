// src/exec/launcher.rs

//! Fire-and-forget process launching.
//!
//! A launched app belongs to the user from the moment it starts: the
//! server logs its output and exit status but never kills it and never
//! reports its fate back to the client. The client already got its
//! response when the launch was confirmed.

use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, error, info};

use crate::errors::{Result, WormholeError};
use crate::resolve::Invocation;

/// Trait abstracting how resolved invocations are launched.
///
/// Production code uses [`ProcessLauncher`]; tests can provide their own
/// implementation that records invocations instead of spawning OS
/// processes.
pub trait Launcher: Send + Sync {
    /// Start the invocation. A `Launch` error means the process never
    /// started; once this returns `Ok`, everything else is asynchronous
    /// and observable only through the log.
    fn launch(&self, invocation: Invocation) -> Result<()>;
}

/// Real launcher used in production.
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, invocation: Invocation) -> Result<()> {
        let Invocation { executable, args } = invocation;

        let mut child = Command::new(&executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| WormholeError::Launch {
                executable: executable.clone(),
                source,
            })?;

        let pid = child.id().unwrap_or(0);
        info!(executable = %executable, pid, ?args, "process started");

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(transcribe("out", pid, stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(transcribe("err", pid, stderr));
        }

        tokio::spawn(supervise(executable, pid, child));

        Ok(())
    }
}

/// Log raw output chunks from one stream of a child process.
///
/// Chunk granularity is whatever the pipe delivers; no line buffering.
async fn transcribe(stream: &'static str, pid: u32, mut source: impl AsyncRead + Unpin) {
    let mut buf = [0u8; 1024];
    loop {
        match source.read(&mut buf).await {
            Ok(0) => return,
            Ok(n) => {
                info!(pid, stream, "{}", String::from_utf8_lossy(&buf[..n]));
            }
            Err(err) => {
                debug!(pid, stream, error = %err, "output stream closed");
                return;
            }
        }
    }
}

/// Wait for the child to exit and log the result.
///
/// Failures here can no longer reach the client; the response went out at
/// launch time.
async fn supervise(executable: String, pid: u32, mut child: Child) {
    match child.wait().await {
        Ok(status) => {
            info!(
                executable = %executable,
                pid,
                exit_code = status.code().unwrap_or(-1),
                success = status.success(),
                "process exited"
            );
        }
        Err(err) => {
            error!(executable = %executable, pid, error = %err, "failed waiting for process");
        }
    }
}
