//! Integration tests for page pollers against the bundled server

use std::sync::Arc;
use std::time::Duration;

use super::common::spawn_server;
use editor_shell::ui::poller::{spawn_poller, PollSpec, SequenceGen, SnapshotSlot, SnapshotSource};
use editor_shell::{ApiClient, Shell};
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn client(base_url: String) -> Arc<dyn SnapshotSource> {
    Arc::new(ApiClient::new(base_url, Duration::from_secs(5)))
}

#[tokio::test]
async fn test_poller_fetches_eagerly_and_repeats() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _handle = spawn_poller(
        client(server.base_url()),
        PollSpec {
            route: "/health".to_string(),
            endpoint: "/api/health".to_string(),
            interval: Some(Duration::from_millis(50)),
        },
        SequenceGen::new(),
        tx,
    );

    let mut slot = SnapshotSlot::new();
    for expected_seq in 1..=2 {
        let update = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(update.route, "/health");
        assert_eq!(update.seq, expected_seq);
        assert!(slot.apply(update.seq, update.result));
    }
    assert_eq!(slot.count(), Some(6));
    assert!(slot.last_error().is_none());
}

#[tokio::test]
async fn test_fetch_once_poller_finishes() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _handle = spawn_poller(
        client(server.base_url()),
        PollSpec {
            route: "/api-client".to_string(),
            endpoint: "/api/api-client/requests".to_string(),
            interval: None,
        },
        SequenceGen::new(),
        tx,
    );

    let update = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    let mut shell = Shell::default();
    shell.navigate("/api-client");
    assert!(shell.apply_poll(update));
    assert_eq!(shell.api_client.requests().len(), 3);
    assert_eq!(shell.api_client.selected_id(), Some(1));

    // No further fetches; the channel closes once the task ends
    assert!(timeout(WAIT, rx.recv()).await.unwrap().is_none());
}

/// A failing endpoint leaves the previous snapshot in place
#[tokio::test]
async fn test_failed_poll_keeps_snapshot() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sequence = SequenceGen::new();
    let source = client(server.base_url());

    let good = spawn_poller(
        source.clone(),
        PollSpec {
            route: "/health".to_string(),
            endpoint: "/api/health".to_string(),
            interval: None,
        },
        sequence.clone(),
        tx.clone(),
    );
    let mut shell = Shell::default();
    let update = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(shell.apply_poll(update));
    drop(good);
    let before = shell.snapshot("/health").and_then(|s| s.data().cloned());
    assert!(before.is_some());

    let _bad = spawn_poller(
        source,
        PollSpec {
            route: "/health".to_string(),
            endpoint: "/api/missing".to_string(),
            interval: None,
        },
        sequence,
        tx,
    );
    let update = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(update.result.is_err());
    assert!(!shell.apply_poll(update));

    let slot = shell.snapshot("/health").unwrap();
    assert_eq!(slot.data().cloned(), before);
    assert!(slot.last_error().is_some());
}

/// Dropping the handle stops the loop
#[tokio::test]
async fn test_dropping_handle_stops_polling() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = spawn_poller(
        client(server.base_url()),
        PollSpec {
            route: "/health".to_string(),
            endpoint: "/api/health".to_string(),
            interval: Some(Duration::from_millis(20)),
        },
        SequenceGen::new(),
        tx,
    );
    timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    drop(handle);

    // Drain anything already in flight; the sender goes away with the task
    while let Some(_update) = timeout(WAIT, rx.recv()).await.unwrap() {}
}
