// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod inject;
pub mod logging;
pub mod resolve;
pub mod server;
pub mod translate;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{ConfigStore, default_config_path};
use crate::dispatch::Dispatcher;
use crate::exec::ProcessLauncher;
use crate::inject::InjectMode;

/// Build version reported by the `VERSION` verb and `--version`.
///
/// Release builds can stamp a tag via the `WORMHOLE_VERSION` compile-time
/// environment variable; otherwise this is the crate version.
pub fn version() -> &'static str {
    option_env!("WORMHOLE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (fatal on failure)
/// - the TCP listener (fatal if the bind fails)
/// - dispatcher + process launcher
/// - (optional) wrapped-command supervision
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.configfile.clone().unwrap_or_else(default_config_path);
    let store = Arc::new(ConfigStore::load(&config_path)?);

    info!(version = version(), "wormhole server starting");

    let listener = TcpListener::bind(store.current().addr()).await?;
    let local_addr = listener.local_addr()?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), ProcessLauncher));

    if args.command.is_empty() {
        server::serve(listener, dispatcher).await?;
        return Ok(());
    }

    let mode = InjectMode::parse(&args.inject);
    let server = tokio::spawn(server::serve(listener, dispatcher));

    // Whichever finishes first ends the process: a client may EXIT the
    // server before the wrapped command is done, or the wrapped command
    // exits and takes the daemon down with it.
    tokio::select! {
        res = server => res??,
        res = inject::run_command(&args.command, &mode, local_addr) => res?,
    }

    Ok(())
}
