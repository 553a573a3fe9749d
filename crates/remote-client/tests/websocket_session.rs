//! Integration tests for a full session over a real WebSocket.
//!
//! A local `tokio-tungstenite` server plays the host: it records every text
//! frame the client sends and optionally answers with frames of its own.
//! The client side is the public `run_session` API with the production
//! `WsChannelFactory`, fed from a scripted input stream.
//!
//! ```text
//! scripted input ──► run_session ──► WsChannel ──► ws://127.0.0.1:<port> ──► recorder
//! ```

use std::sync::{atomic::AtomicBool, Arc};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};

use remote_client::domain::ClientConfig;
use remote_client::infrastructure::{run_session, WsChannelFactory};

/// Starts a host that records text frames until the client closes.
///
/// When `greeting` is set, the host sends it right after the handshake.
async fn spawn_host(greeting: Option<&'static str>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        if let Some(text) = greeting {
            ws.send(WsMessage::Text(text.to_string())).await.unwrap();
        }

        let mut received = Vec::new();
        while let Some(msg) = ws.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => received.push(text),
                Ok(WsMessage::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
        received
    });

    (format!("ws://{addr}/remote"), handle)
}

fn fast_config(endpoint: String) -> ClientConfig {
    ClientConfig {
        endpoint: Some(endpoint),
        flush_period: Duration::from_millis(5),
        poll_period: Duration::from_millis(5),
        ..ClientConfig::default()
    }
}

/// Tap, pause, key press: the host must see two frames in order, then a
/// clean close.
#[tokio::test]
async fn test_frames_reach_host_in_flush_order() {
    // Arrange
    let (endpoint, host) = spawn_host(None).await;
    let input = tokio_test::io::Builder::new()
        .read(b"{\"type\":\"Tap\"}\n")
        .wait(Duration::from_millis(100))
        .read(b"{\"type\":\"KeyDown\",\"code\":65}\n")
        .wait(Duration::from_millis(50))
        .build();
    let running = Arc::new(AtomicBool::new(true));

    // Act
    let summary = run_session(
        fast_config(endpoint),
        BufReader::new(input),
        Box::new(WsChannelFactory::new()),
        running,
    )
    .await
    .unwrap();
    let received = tokio::time::timeout(Duration::from_secs(5), host)
        .await
        .expect("host should see the close")
        .unwrap();

    // Assert
    assert_eq!(summary.frames_sent, 2);
    assert_eq!(received, vec![r#"{"mc":1}"#.to_string(), r#"{"kp":65}"#.to_string()]);
}

/// A drag: tap, press within the tap window, slide, release.
#[tokio::test]
async fn test_drag_gesture_is_sent_as_press_move_release() {
    // Arrange
    let (endpoint, host) = spawn_host(None).await;
    let input = tokio_test::io::Builder::new()
        .read(b"{\"type\":\"Press\",\"x\":10,\"y\":10,\"t\":1000}\n")
        .read(b"{\"type\":\"Release\",\"t\":1040}\n")
        .read(b"{\"type\":\"Press\",\"x\":10,\"y\":10,\"t\":1100}\n")
        .read(b"{\"type\":\"Move\",\"x\":14,\"y\":13,\"t\":1116}\n")
        .read(b"{\"type\":\"Move\",\"x\":20,\"y\":13,\"t\":1132}\n")
        .wait(Duration::from_millis(60))
        .read(b"{\"type\":\"Release\",\"t\":1200}\n")
        .wait(Duration::from_millis(60))
        .build();
    let running = Arc::new(AtomicBool::new(true));

    // Act
    run_session(
        fast_config(endpoint),
        BufReader::new(input),
        Box::new(WsChannelFactory::new()),
        running,
    )
    .await
    .unwrap();
    let received = tokio::time::timeout(Duration::from_secs(5), host)
        .await
        .expect("host should see the close")
        .unwrap();

    // Assert: moves are summed; press and release travel in separate frames
    let frames: Vec<serde_json::Value> = received
        .iter()
        .map(|t| serde_json::from_str(t).unwrap())
        .collect();
    let first_press = frames.iter().position(|f| f.get("mp").is_some()).unwrap();
    let release = frames.iter().position(|f| f.get("mr").is_some()).unwrap();
    assert!(first_press < release);
    let total_dx: f64 = frames
        .iter()
        .filter_map(|f| f.get("mm"))
        .map(|mm| mm[0].as_f64().unwrap())
        .sum();
    assert_eq!(total_dx, 10.0);
    assert!(frames.iter().all(|f| f.get("mc").is_none()));
}

/// Host frames are received and parsed without disturbing the session.
#[tokio::test]
async fn test_host_greeting_is_consumed() {
    // Arrange
    let (endpoint, host) = spawn_host(Some(r#"{"hello":"host"}"#)).await;
    let input = tokio_test::io::Builder::new()
        .wait(Duration::from_millis(150))
        .read(b"{\"type\":\"Tap\"}\n")
        .build();
    let running = Arc::new(AtomicBool::new(true));

    // Act
    let summary = run_session(
        fast_config(endpoint),
        BufReader::new(input),
        Box::new(WsChannelFactory::new()),
        running,
    )
    .await
    .unwrap();
    let received = tokio::time::timeout(Duration::from_secs(5), host)
        .await
        .expect("host should see the close")
        .unwrap();

    // Assert
    assert_eq!(summary.inbound_frames, 1);
    assert_eq!(received, vec![r#"{"mc":1}"#.to_string()]);
}
