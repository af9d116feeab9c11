//! Live status channel tests against an in-process WebSocket server.
//!
//! Reconnect delays are shortened to keep the suite fast; the assertions use
//! generous timeouts so they stay stable on loaded machines.

use futures_util::SinkExt;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tubedeck::channel::{StatusChannel, StatusEvent};
use url::Url;

const RECONNECT: Duration = Duration::from_millis(200);

async fn ws_listener() -> (TcpListener, Url) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("ws://{}", listener.local_addr().unwrap())).unwrap();
    (listener, url)
}

async fn next(channel: &mut StatusChannel) -> StatusEvent {
    timeout(Duration::from_secs(5), channel.next_event())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed unexpectedly")
}

#[tokio::test]
async fn test_delivers_parsed_events() {
    let (listener, url) = ws_listener().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let payload = json!({
            "status": "downloading",
            "progress": 42.7,
            "speed": 2_097_152.0,
            "eta": 75,
        });
        ws.send(Message::Text(payload.to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let mut channel = StatusChannel::connect(url, RECONNECT);
    match next(&mut channel).await {
        StatusEvent::Downloading { progress, speed, eta, .. } => {
            assert_eq!(progress, Some(42.7));
            assert_eq!(speed, Some(2_097_152.0));
            assert_eq!(eta, Some(75.0));
        }
        other => panic!("expected downloading event, got {:?}", other),
    }
    channel.shutdown().await;
}

#[tokio::test]
async fn test_reconnects_after_server_close() {
    let (listener, url) = ws_listener().await;
    tokio::spawn(async move {
        // First connection: handshake, then drop straight away.
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        drop(ws);

        // Second connection: deliver an event so the client proves it came back.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let payload = json!({ "status": "finished", "message": "ファイルを処理中..." });
        ws.send(Message::Text(payload.to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let started = Instant::now();
    let mut channel = StatusChannel::connect(url, RECONNECT);
    match next(&mut channel).await {
        StatusEvent::Finished { message } => {
            assert_eq!(message.as_deref(), Some("ファイルを処理中..."));
        }
        other => panic!("expected finished event, got {:?}", other),
    }
    // The event arrived on the second connection, so at least one full
    // reconnect delay must have elapsed.
    assert!(started.elapsed() >= RECONNECT);
    channel.shutdown().await;
}

#[tokio::test]
async fn test_malformed_payload_is_dropped_without_reconnect() {
    let (listener, url) = ws_listener().await;
    let accepts = Arc::new(AtomicUsize::new(0));
    let server_accepts = accepts.clone();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        server_accepts.fetch_add(1, Ordering::SeqCst);
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text("this is not json".to_string())).await.unwrap();
        let payload = json!({
            "status": "completed",
            "download_id": "abc",
            "result": { "id": "abc", "filename": "v.mp4", "title": "V" },
        });
        ws.send(Message::Text(payload.to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        // Any reconnect attempt would land here.
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            server_accepts.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let mut channel = StatusChannel::connect(url, RECONNECT);
    match next(&mut channel).await {
        StatusEvent::Completed { result } => assert_eq!(result.id, "abc"),
        other => panic!("expected completed event, got {:?}", other),
    }
    // Give a would-be reconnect time to show up, then check it never did.
    tokio::time::sleep(RECONNECT * 3).await;
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
    channel.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_the_reconnect_loop() {
    let (listener, url) = ws_listener().await;
    let accepts = Arc::new(AtomicUsize::new(0));
    let server_accepts = accepts.clone();
    tokio::spawn(async move {
        // Drop every connection immediately to keep the client reconnecting.
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            server_accepts.fetch_add(1, Ordering::SeqCst);
            let ws = accept_async(stream).await.unwrap();
            drop(ws);
        }
    });

    let channel = StatusChannel::connect(url, Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(accepts.load(Ordering::SeqCst) >= 1);

    // shutdown() waits for the task, so no connection can start afterwards.
    channel.shutdown().await;
    let settled = accepts.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(accepts.load(Ordering::SeqCst), settled);
}
