//! The realtime WebSocket: one socket per subscriber per room.
//!
//! Outbound, the socket multiplexes the room's change feed and its
//! ephemeral side channel as tagged [`RoomEvent`] frames. Inbound, any
//! text frame is parsed as JSON and published to the ephemeral channel
//! (cosmetic payloads the opponent needs once but nobody stores).
//! Dropping the socket drops both subscriptions.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use duelgate_protocol::{RoomCode, RoomEvent, RoomQuery};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};

use crate::extract::ApiQuery;
use crate::AppState;

pub(crate) async fn realtime_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RoomQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay(socket, state, query.room_code))
}

async fn relay(socket: WebSocket, state: AppState, code: RoomCode) {
    let mut events = state.realtime.subscribe(&code).await;
    let mut broadcasts = state.realtime.listen(&code).await;
    let (mut outbound, mut inbound) = socket.split();
    tracing::debug!(%code, "realtime socket opened");

    loop {
        tokio::select! {
            event = events.next() => {
                // None: the room was deleted and the feed closed.
                let Some(event) = event else { break };
                if send_frame(&mut outbound, &event).await.is_err() {
                    break;
                }
            }
            payload = broadcasts.next() => {
                let Some(payload) = payload else { break };
                let frame = RoomEvent::Broadcast(payload);
                if send_frame(&mut outbound, &frame).await.is_err() {
                    break;
                }
            }
            msg = inbound.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str(&text) {
                            Ok(value) => {
                                state.realtime.publish(&code, value).await;
                            }
                            Err(err) => tracing::debug!(
                                %code, %err,
                                "dropping unparseable broadcast frame"
                            ),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!(%code, %err, "socket receive error");
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!(%code, "realtime socket closed");
}

async fn send_frame(
    outbound: &mut SplitSink<WebSocket, Message>,
    event: &RoomEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => outbound.send(Message::Text(json)).await,
        Err(err) => {
            tracing::error!(%err, "event failed to serialize, skipping");
            Ok(())
        }
    }
}
