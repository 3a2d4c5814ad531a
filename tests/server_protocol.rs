use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use wormhole::config::ConfigStore;
use wormhole::dispatch::Dispatcher;
use wormhole::exec::ProcessLauncher;
use wormhole::server;

type TestResult = Result<(), Box<dyn Error>>;

const CONFIG: &str = r#"
[[mapping]]
from = "/home/"
to = "A:"

[apps]
sublime = "/opt/sublime/sublime"
"#;

struct TestServer {
    addr: std::net::SocketAddr,
    handle: JoinHandle<wormhole::errors::Result<()>>,
    _config: NamedTempFile,
}

async fn start_server() -> Result<TestServer, Box<dyn Error>> {
    let mut config = NamedTempFile::new()?;
    config.write_all(CONFIG.as_bytes())?;

    let store = Arc::new(ConfigStore::load(config.path())?);
    let dispatcher = Arc::new(Dispatcher::new(store, ProcessLauncher));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(server::serve(listener, dispatcher));

    Ok(TestServer {
        addr,
        handle,
        _config: config,
    })
}

/// One request line in, one response line out, connection closed.
async fn request(addr: std::net::SocketAddr, line: &str) -> Result<String, Box<dyn Error>> {
    let stream = TcpStream::connect(addr).await?;
    let (reader, mut writer) = stream.into_split();

    writer.write_all(line.as_bytes()).await?;

    let mut response = String::new();
    BufReader::new(reader).read_line(&mut response).await?;
    Ok(response)
}

#[tokio::test]
async fn version_round_trip() -> TestResult {
    let server = start_server().await?;
    let response = request(server.addr, "VERSION\n").await?;
    assert_eq!(response, format!("[OK] {}\n", wormhole::version()));
    Ok(())
}

#[tokio::test]
async fn unknown_command_is_an_err_line_listing_apps() -> TestResult {
    let server = start_server().await?;
    let response = request(server.addr, "FOO\n").await?;
    assert_eq!(
        response,
        "[ERR] Unknown command, expected one of sublime\n"
    );
    Ok(())
}

#[tokio::test]
async fn invoke_without_mapping_is_an_err_line() -> TestResult {
    let server = start_server().await?;
    let response = request(server.addr, "INVOKE\n").await?;
    assert_eq!(response, "[ERR] Too few words, expected at least 2.\n");
    Ok(())
}

#[tokio::test]
async fn invoke_of_unknown_mapping_is_an_err_line() -> TestResult {
    let server = start_server().await?;
    let response = request(server.addr, "INVOKE emacs\n").await?;
    assert_eq!(response, "[ERR] No mapping for 'emacs'\n");
    Ok(())
}

#[tokio::test]
async fn connections_are_independent() -> TestResult {
    let server = start_server().await?;

    // A client that never sends a newline must not block other clients.
    let _hung = TcpStream::connect(server.addr).await?;

    let response = request(server.addr, "VERSION\n").await?;
    assert!(response.starts_with("[OK] "));
    Ok(())
}

#[tokio::test]
async fn disconnect_without_a_line_gets_no_response() -> TestResult {
    let server = start_server().await?;

    // Close immediately: the handler sees an empty stream and stays quiet.
    drop(TcpStream::connect(server.addr).await?);

    // The server is still accepting afterwards.
    let response = request(server.addr, "VERSION\n").await?;
    assert!(response.starts_with("[OK] "));
    Ok(())
}

#[tokio::test]
async fn exit_answers_then_stops_accepting() -> TestResult {
    let server = start_server().await?;

    let response = request(server.addr, "EXIT\n").await?;
    assert_eq!(response, "[OK] Bye!\n");

    // The accept loop terminates...
    let served = tokio::time::timeout(Duration::from_secs(5), server.handle).await??;
    served?;

    // ...and the port no longer accepts connections.
    assert!(TcpStream::connect(server.addr).await.is_err());
    Ok(())
}
