//! WebSocket push endpoints.
//!
//! A client connects to `/ws/{unit}` (flat) or `/ws/hourly/{unit}` and sends
//! a range request such as `{"start_time": "2024-03-01T08:00:00"}`. The
//! server answers at once and then re-runs the query on every push interval
//! until the client disconnects or the server shuts down. A new request
//! replaces the range being followed.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::dto::{ErrorFrame, RangeQuery};
use super::error::{ApiError, AppError};
use super::handlers::plant_now;
use super::state::AppState;
use crate::services::{run_query, QueryMode, SubscriptionHandle};

/// GET /ws/{unit}
pub async fn ws_production(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(unit): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_push_stream(socket, state, unit, QueryMode::Flat))
}

/// GET /ws/hourly/{unit}
pub async fn ws_hourly(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(unit): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_push_stream(socket, state, unit, QueryMode::Hourly))
}

async fn handle_push_stream(socket: WebSocket, state: AppState, unit: String, mode: QueryMode) {
    let (mut sender, mut receiver) = socket.split();
    let subscription = state.subscriptions.register(unit.clone(), mode);
    let mut shutdown = Box::pin(state.subscriptions.shutdown_signal());

    let mut ticker = interval(state.config.push_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut range: Option<RangeQuery> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Closing {} subscription {} for shutdown", mode, subscription.id());
                let _ = sender.send(Message::Close(None)).await;
                break;
            }

            next = receiver.next() => {
                match next {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<RangeQuery>(text.as_str()) {
                            Ok(query) => {
                                subscription.update_range(query.start_time, query.end_time);
                                let keep_open =
                                    push(&mut sender, &state, &unit, mode, &query, &subscription).await;
                                range = Some(query);
                                ticker.reset();
                                if !keep_open {
                                    break;
                                }
                            }
                            Err(e) => {
                                let frame = ErrorFrame {
                                    error: ApiError::new("BAD_REQUEST", format!("Invalid request: {}", e)),
                                };
                                if !send_json(&mut sender, &frame).await {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = sender.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket closed by client ({} {})", mode, unit);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("WebSocket receive error for {}: {}", unit, err);
                        break;
                    }
                }
            }

            _ = ticker.tick() => {
                if let Some(query) = &range {
                    if !push(&mut sender, &state, &unit, mode, query, &subscription).await {
                        break;
                    }
                }
            }
        }
    }
}

/// Run the query and send its result. Returns `false` once the client is gone.
async fn push(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
    unit: &str,
    mode: QueryMode,
    query: &RangeQuery,
    subscription: &SubscriptionHandle,
) -> bool {
    let result = match query.resolve(plant_now(), state.config.max_range()) {
        Ok((start, end)) => run_query(
            state.repository.as_ref(),
            unit,
            start,
            end,
            mode,
            state.config.fetch_concurrency,
        )
        .await
        .map_err(AppError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            let sent = send_json(sender, &report).await;
            if sent {
                subscription.mark_pushed();
            }
            sent
        }
        Err(e) => {
            let error = e.to_api_error();
            warn!("Push for {} ({}) failed: {}", unit, mode, error.message);
            let frame = ErrorFrame { error };
            send_json(sender, &frame).await
        }
    }
}

async fn send_json<T: serde::Serialize>(
    sender: &mut SplitSink<WebSocket, Message>,
    value: &T,
) -> bool {
    let payload = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            error!("Failed to serialise push frame: {}", err);
            return true;
        }
    };

    if sender.send(Message::Text(payload.into())).await.is_err() {
        info!("WebSocket client disconnected");
        return false;
    }
    true
}
