use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{error, info, warn};
use tokio::sync::mpsc;
use warp::ws::WebSocket;

use crate::core::coordinator::SharedCoordinator;
use crate::handlers::dispatcher::MessageDispatcher;

// Handle a WebSocket connection from upgrade to disconnect
pub async fn handle_ws_client(ws: WebSocket, coordinator: SharedCoordinator) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Spawn a task to forward messages from our channel to the WebSocket
    tokio::task::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Register the client; this also confirms the identity to the client
    // and publishes the new online count
    let client_id = coordinator.write().await.connect(tx);
    info!("Client connected: {}", client_id);
    info!(
        "Current connections: {}",
        coordinator.read().await.client_count()
    );

    let dispatcher = MessageDispatcher::new(coordinator.clone());

    // Handle incoming messages
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                // Only process text messages
                if msg.is_text() {
                    match msg.to_str() {
                        Ok(text) => dispatcher.dispatch(&client_id, text).await,
                        Err(_) => warn!("Failed to extract text from message"),
                    }
                }
            }
            Err(e) => {
                error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
        }
    }

    // Client disconnected: cancel its queue entry, abandon its session
    // and notify the opponent, then drop the identity
    coordinator.write().await.disconnect(&client_id);
    info!("Client disconnected: {}", client_id);
}
