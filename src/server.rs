// src/server.rs

//! TCP connection server: one request line in, one response line out.
//!
//! Every accepted connection is handled in its own task. Connections are
//! fully independent; the only shared state between them is the
//! configuration snapshot behind the dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::dispatch::{Dispatcher, Reply};
use crate::errors::Result;
use crate::exec::Launcher;

/// Accept connections until a client issues `EXIT`.
///
/// The caller binds the listener, so a bind failure is a startup failure,
/// not ours. Accept errors are logged and the loop keeps going.
pub async fn serve<L>(listener: TcpListener, dispatcher: Arc<Dispatcher<L>>) -> Result<()>
where
    L: Launcher + 'static,
{
    info!(address = %listener.local_addr()?, "listening");

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let dispatcher = Arc::clone(&dispatcher);
                        let shutdown = shutdown_tx.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, peer, dispatcher, shutdown).await;
                        });
                    }
                    Err(err) => {
                        error!(error = %err, "failed to accept connection");
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("shutdown requested, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

/// Handle one connection: read a line, dispatch it, write the response.
///
/// A read failure or an empty stream closes the connection without a
/// response. On `EXIT` the shutdown signal is sent only after the write,
/// so delivery of the farewell is attempted but not guaranteed.
async fn handle_connection<L>(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher<L>>,
    shutdown: mpsc::Sender<()>,
) where
    L: Launcher,
{
    debug!(%peer, "connection accepted");

    let (reader, mut writer) = stream.into_split();
    let mut line = String::new();

    match BufReader::new(reader).read_line(&mut line).await {
        Ok(0) => {
            debug!(%peer, "connection closed before a request line");
            return;
        }
        Ok(_) => {}
        Err(err) => {
            warn!(%peer, error = %err, "failed to read request line");
            return;
        }
    }

    debug!(%peer, line = %line.trim_end(), "request");

    let result = dispatcher.dispatch(&line);

    let response = match &result {
        Ok(reply) => {
            info!(%peer, response = %reply.text(), "request handled");
            format!("[OK] {}\n", reply.text())
        }
        Err(err) => {
            warn!(%peer, error = %err, "request failed");
            format!("[ERR] {err}\n")
        }
    };

    if let Err(err) = writer.write_all(response.as_bytes()).await {
        warn!(%peer, error = %err, "failed to write response");
    }

    if let Ok(Reply::Exit(_)) = result {
        let _ = shutdown.send(()).await;
    }

    debug!(%peer, "connection closed");
}
