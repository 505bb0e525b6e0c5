//! Shared test utilities for editor-shell
//!
//! - Temporary SQLite-backed state storage
//! - A bundled API server on an ephemeral port

use std::net::SocketAddr;
use std::time::Duration;

use editor_shell::web::server::serve;
use editor_shell::{AppStateStore, Database, WebAppState};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Storage over a database in a temporary directory
pub fn create_test_storage() -> (AppStateStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(dir.path().join("test.db")).expect("Failed to open database");
    (AppStateStore::new(db.connection()), dir)
}

/// A running API server; stops when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
    _task: JoinHandle<()>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Start the API server with the seeded request store
pub async fn spawn_server(proxy_timeout: Duration) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let task = tokio::spawn(async move {
        serve(listener, WebAppState::seeded(proxy_timeout), true, async move {
            token.cancelled().await
        })
        .await
        .expect("Test server failed");
    });

    TestServer {
        addr,
        shutdown,
        _task: task,
    }
}
