//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ParticipantIdFactory, outbound_channel},
    ui::{lifecycle::ConnectionLifecycle, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the outbound queue into the WebSocket sender.
///
/// Every message addressed to this client (greeting, replies, broadcasts from
/// other clients) goes through `rx`, so the client sees them in queue order.
/// The loop ends once every sender handle is dropped or the socket fails.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = ParticipantIdFactory::generate();
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, rx) = outbound_channel();
    let mut send_task = pusher_loop(rx, sender);

    let mut lifecycle = ConnectionLifecycle::new(state, id.clone(), tx);
    if lifecycle.activate().await.is_err() {
        // The error event is already queued; dropping the lifecycle closes the
        // queue so the writer flushes it and closes the socket.
        drop(lifecycle);
        let _ = send_task.await;
        return;
    }
    tracing::info!("Client '{}' connected", id);

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => lifecycle.handle_text(text.as_str()).await,
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Client '{}' requested close", id);
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!("Ignoring binary frame from '{}'", id);
                    }
                    Some(Ok(_)) => {
                        // Ping/pong is handled automatically by the WebSocket protocol
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error from '{}': {}", id, e);
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut send_task => {
                tracing::debug!("Writer for '{}' stopped", id);
                break;
            }
        }
    }

    send_task.abort();
    lifecycle.teardown().await;
}
