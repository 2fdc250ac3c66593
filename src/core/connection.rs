//! WebSocket connection management
//! Tracks one connected identity and its outbound channel

use log::warn;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::Message;

use crate::core::message_types::ServerMessage;

/// Represents the state of a single WebSocket connection
pub struct Connection {
    pub id: String,
    pub display_name: Option<String>,
    pub sender: mpsc::UnboundedSender<Message>,
    pub connected_at: Instant,
}

impl Connection {
    /// Create a new connection with a unique ID
    pub fn new(sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: None,
            sender,
            connected_at: Instant::now(),
        }
    }

    /// Send a message through this connection, best effort
    pub fn send_json(&self, message: &ServerMessage) -> bool {
        let text = serde_json::to_string(message).unwrap_or_default();
        match self.sender.send(Message::text(text)) {
            Ok(_) => true,
            Err(_) => {
                warn!("Failed to send message to client {}", self.id);
                false
            }
        }
    }

    /// Whether this identity counts toward the public online tally.
    /// Unnamed, guest and anonymous identities are not counted.
    pub fn is_public(&self) -> bool {
        match &self.display_name {
            Some(name) => {
                let lower = name.to_lowercase();
                !lower.starts_with("guest") && !lower.starts_with("anonymous")
            }
            None => false,
        }
    }

    /// Calculate the connection duration
    pub fn connection_duration(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
