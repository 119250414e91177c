#![cfg(feature = "http-server")]

mod support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use oee_rust::db::{FullRepository, LocalRepository};
use oee_rust::http::{create_router, AppState, ServerConfig};
use support::{at, day_shift_repository};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

async fn serve(repo: LocalRepository, push_interval: Duration) -> (SocketAddr, AppState) {
    let config = ServerConfig {
        push_interval,
        ..ServerConfig::default()
    };
    let state = AppState::with_config(Arc::new(repo) as Arc<dyn FullRepository>, config);
    let app = create_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (client, _) = connect_async(format!("ws://{}{}", addr, path)).await.unwrap();
    client
}

async fn send(client: &mut Client, frame: Value) {
    client.send(Message::text(frame.to_string())).await.unwrap();
}

async fn next_frame(client: &mut Client) -> Value {
    loop {
        let message = timeout(FRAME_TIMEOUT, client.next())
            .await
            .expect("no frame before timeout")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn eventually(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + FRAME_TIMEOUT;
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met before timeout");
        sleep(Duration::from_millis(20)).await;
    }
}

fn morning(end: &str) -> Value {
    json!({ "start_time": "2024-03-01T08:00:00", "end_time": end })
}

#[tokio::test]
async fn test_request_is_answered_immediately() {
    // Long interval: only the immediate answer can arrive in time.
    let (addr, state) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T10:30:00")).await;
    let frame = next_frame(&mut client).await;
    assert_eq!(frame["unit_name"], "LINE-1");
    assert_eq!(frame["total_qty"], 220);
    assert_eq!(frame["hourly_data"].as_array().unwrap().len(), 3);

    let subscriptions = state.subscriptions.list();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].start_time, Some(at(8, 0)));
    assert_eq!(subscriptions[0].end_time, Some(at(10, 30)));
    eventually(|| state.subscriptions.list()[0].push_count == 1).await;
}

#[tokio::test]
async fn test_flat_stream_pushes_model_summaries() {
    let (addr, _) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/LINE-1").await;

    send(&mut client, morning("2024-03-01T09:00:00")).await;
    let frame = next_frame(&mut client).await;
    let models = frame.as_array().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["model"], "A");
    assert_eq!(models[0]["total_qty"], 120);
}

#[tokio::test]
async fn test_pushes_repeat_on_interval() {
    let (addr, state) = serve(day_shift_repository(), Duration::from_millis(100)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T10:30:00")).await;
    for _ in 0..3 {
        let frame = next_frame(&mut client).await;
        assert_eq!(frame["total_qty"], 220);
    }
    eventually(|| state.subscriptions.list()[0].push_count >= 3).await;
}

#[tokio::test]
async fn test_new_request_replaces_range() {
    let (addr, state) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T10:30:00")).await;
    assert_eq!(next_frame(&mut client).await["total_qty"], 220);

    send(&mut client, morning("2024-03-01T09:00:00")).await;
    let frame = next_frame(&mut client).await;
    assert_eq!(frame["total_qty"], 120);
    assert_eq!(frame["hourly_data"].as_array().unwrap().len(), 1);

    assert_eq!(state.subscriptions.list()[0].end_time, Some(at(9, 0)));
    eventually(|| state.subscriptions.list()[0].push_count == 2).await;
}

#[tokio::test]
async fn test_malformed_request_keeps_stream_open() {
    let (addr, _) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    client.send(Message::text("not json".to_string())).await.unwrap();
    let frame = next_frame(&mut client).await;
    assert_eq!(frame["error"]["code"], "BAD_REQUEST");

    send(&mut client, json!({ "start_time": "yesterday" })).await;
    assert_eq!(next_frame(&mut client).await["error"]["code"], "BAD_REQUEST");

    send(&mut client, morning("2024-03-01T09:00:00")).await;
    assert_eq!(next_frame(&mut client).await["total_qty"], 120);
}

#[tokio::test]
async fn test_query_errors_are_pushed_as_frames() {
    let (addr, _) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T07:00:00")).await;
    assert_eq!(next_frame(&mut client).await["error"]["code"], "INVALID_RANGE");

    send(
        &mut client,
        json!({ "start_time": "1900-01-01T00:00:00", "end_time": "2024-03-01T09:00:00" }),
    )
    .await;
    assert_eq!(next_frame(&mut client).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_outage_is_pushed_and_retried_on_next_tick() {
    let repo = day_shift_repository();
    repo.set_healthy(false);
    let (addr, state) = serve(repo.clone(), Duration::from_millis(200)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T10:30:00")).await;
    let frame = next_frame(&mut client).await;
    assert_eq!(frame["error"]["code"], "DATA_SOURCE_UNAVAILABLE");
    assert_eq!(frame["error"]["details"], "retryable");
    assert_eq!(state.subscriptions.list()[0].push_count, 0);

    repo.set_healthy(true);
    let frame = loop {
        let frame = next_frame(&mut client).await;
        if frame.get("error").is_none() {
            break frame;
        }
        // A tick may still have hit the outage.
        assert_eq!(frame["error"]["code"], "DATA_SOURCE_UNAVAILABLE");
    };
    assert_eq!(frame["total_qty"], 220);
    eventually(|| state.subscriptions.list()[0].push_count >= 1).await;
}

#[tokio::test]
async fn test_closing_socket_drops_subscription() {
    let (addr, state) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T09:00:00")).await;
    next_frame(&mut client).await;
    assert_eq!(state.subscriptions.len(), 1);

    client.close(None).await.unwrap();
    eventually(|| state.subscriptions.is_empty()).await;
}

#[tokio::test]
async fn test_shutdown_closes_streams() {
    let (addr, state) = serve(day_shift_repository(), Duration::from_secs(3600)).await;
    let mut client = connect(addr, "/ws/hourly/LINE-1").await;

    send(&mut client, morning("2024-03-01T09:00:00")).await;
    next_frame(&mut client).await;

    state.subscriptions.shutdown();
    let message = timeout(FRAME_TIMEOUT, client.next())
        .await
        .expect("stream still open after shutdown");
    assert!(matches!(message, Some(Ok(Message::Close(_))) | None));
    eventually(|| state.subscriptions.is_empty()).await;
}
