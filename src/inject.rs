// src/inject.rs

//! Hand-off of the bound address to a wrapped child command.
//!
//! When wormhole is started supervising a command (typically the
//! interactive session whose tools will call back in), the child needs to
//! know where to send its requests. The bound port and IP are exported
//! either as environment variables or through a file the child can read.

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::{Result, WormholeError};

/// How the bound address is exposed to the wrapped command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectMode {
    /// `WORMHOLE_PORT` / `WORMHOLE_IP` environment variables.
    Environment,
    /// A file with `WORMHOLE_PORT=...` and `WORMHOLE_IP=...` lines,
    /// removed after the command exits.
    File(PathBuf),
}

impl InjectMode {
    /// Parse the `--inject` flag value: `:environment` or a file path.
    pub fn parse(value: &str) -> Self {
        if value == ":environment" {
            InjectMode::Environment
        } else {
            InjectMode::File(PathBuf::from(value))
        }
    }
}

/// Run the wrapped command to completion with the bound address injected.
///
/// Stdio is inherited so interactive children work normally. The server
/// keeps serving while the command runs; wormhole exits when it does.
pub async fn run_command(
    command: &[String],
    mode: &InjectMode,
    addr: SocketAddr,
) -> Result<()> {
    let Some((executable, args)) = command.split_first() else {
        return Err(WormholeError::Config(
            "no command given to supervise".to_string(),
        ));
    };

    let mut cmd = Command::new(executable);
    cmd.args(args);

    match mode {
        InjectMode::Environment => {
            cmd.env("WORMHOLE_PORT", addr.port().to_string());
            cmd.env("WORMHOLE_IP", addr.ip().to_string());
        }
        InjectMode::File(path) => {
            let contents = format!(
                "WORMHOLE_PORT={}\nWORMHOLE_IP={}\n",
                addr.port(),
                addr.ip()
            );
            std::fs::write(path, contents)?;
        }
    }

    info!(executable = %executable, "wormhole command starting");

    let status = {
        let mut child = cmd.spawn().map_err(|source| WormholeError::Launch {
            executable: executable.clone(),
            source,
        })?;
        child.wait().await?
    };

    if let InjectMode::File(path) = mode {
        if let Err(err) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %err, "failed to remove inject file");
        }
    }

    info!(
        exit_code = status.code().unwrap_or(-1),
        "wormhole command exited"
    );
    Ok(())
}
