//! Per-frame routing for the matchmaking protocol

use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::MAX_MESSAGE_SIZE;
use crate::core::coordinator::{spawn_eviction_timer, SharedCoordinator};
use crate::core::message_types::ClientMessage;
use crate::error::GridMatchError;

/// Message kinds the dispatcher recognizes; anything else is a
/// protocol error surfaced to the client
const KNOWN_MESSAGE_TYPES: [&str; 3] = ["register", "findGame", "move"];

/// Routes parsed frames into coordinator operations and converts their
/// failures into error replies. Nothing here closes the connection.
pub struct MessageDispatcher {
    coordinator: SharedCoordinator,
}

impl MessageDispatcher {
    pub fn new(coordinator: SharedCoordinator) -> Self {
        Self { coordinator }
    }

    /// Process one inbound text frame from `sender_id`
    pub async fn dispatch(&self, sender_id: &str, text: &str) {
        if text.len() > MAX_MESSAGE_SIZE {
            warn!(
                "Dropping oversized frame from {}: {} bytes",
                sender_id,
                text.len()
            );
            return;
        }

        // Unparseable frames are dropped without a reply
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Dropping unparseable frame from {}: {}", sender_id, e);
                return;
            }
        };

        let kind = match value.get("type").and_then(Value::as_str) {
            Some(kind) => kind.to_string(),
            None => {
                self.reject(
                    sender_id,
                    GridMatchError::ProtocolError("Missing message type".to_string()),
                )
                .await;
                return;
            }
        };

        if !KNOWN_MESSAGE_TYPES.contains(&kind.as_str()) {
            self.reject(
                sender_id,
                GridMatchError::ProtocolError(format!("Unknown message type: {}", kind)),
            )
            .await;
            return;
        }

        // The tag is known, so a failure here is a malformed payload
        let message: ClientMessage = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                debug!("Malformed {} payload from {}: {}", kind, sender_id, e);
                self.reject(
                    sender_id,
                    GridMatchError::ValidationError(format!("Malformed {} payload", kind)),
                )
                .await;
                return;
            }
        };

        let result = match message {
            ClientMessage::Register { username } => {
                let entry_id = Uuid::new_v4();
                let timer =
                    spawn_eviction_timer(self.coordinator.clone(), sender_id.to_string(), entry_id);
                self.coordinator
                    .write()
                    .await
                    .register(sender_id, &username, entry_id, timer)
            }
            ClientMessage::FindGame => {
                let entry_id = Uuid::new_v4();
                let timer =
                    spawn_eviction_timer(self.coordinator.clone(), sender_id.to_string(), entry_id);
                self.coordinator
                    .write()
                    .await
                    .find_game(sender_id, entry_id, timer)
            }
            ClientMessage::Move { row, col } => self
                .coordinator
                .write()
                .await
                .apply_move(sender_id, row, col),
        };

        if let Err(error) = result {
            self.reject(sender_id, error).await;
        }
    }

    async fn reject(&self, sender_id: &str, error: GridMatchError) {
        debug!("Request from {} rejected: {}", sender_id, error);
        self.coordinator.read().await.send_error(sender_id, &error);
    }
}
