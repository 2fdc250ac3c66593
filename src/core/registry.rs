//! Connection registry tracking live identities and their channels

use std::collections::HashMap;
use tokio::sync::mpsc;
use warp::ws::Message;

use log::debug;

use crate::constants::{USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH};
use crate::core::connection::Connection;
use crate::core::message_types::ServerMessage;
use crate::error::{GridMatchError, Result};

/// Manages connected identities and their outbound channels
pub struct Registry {
    connections: HashMap<String, Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Register a new connection and return its freshly allocated identity
    pub fn register(&mut self, sender: mpsc::UnboundedSender<Message>) -> String {
        let connection = Connection::new(sender);
        let id = connection.id.clone();
        self.connections.insert(id.clone(), connection);
        id
    }

    /// Validate and set a display name for an identity
    pub fn set_display_name(&mut self, id: &str, name: &str) -> Result<()> {
        validate_username(name)?;
        if let Some(connection) = self.connections.get_mut(id) {
            connection.display_name = Some(name.to_string());
        }
        Ok(())
    }

    /// Remove an identity; absent identities are a no-op
    pub fn remove(&mut self, id: &str) {
        if let Some(connection) = self.connections.remove(id) {
            debug!(
                "Removed client {} after {:?} connected",
                id,
                connection.connection_duration()
            );
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.connections.get(id).and_then(|c| c.display_name.as_deref())
    }

    /// Send a message to a single identity, best effort
    pub fn send_to(&self, id: &str, message: &ServerMessage) -> bool {
        match self.connections.get(id) {
            Some(connection) => connection.send_json(message),
            None => false,
        }
    }

    /// Broadcast a message to every connected identity, best effort
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let mut success_count = 0;

        for connection in self.connections.values() {
            if connection.send_json(message) {
                success_count += 1;
            }
        }

        success_count
    }

    /// Number of identities shown in the public online count
    pub fn public_count(&self) -> usize {
        self.connections.values().filter(|c| c.is_public()).count()
    }

    /// Get current clients count
    pub fn client_count(&self) -> usize {
        self.connections.len()
    }
}

/// Display names are 3 to 20 characters, letters, digits and underscores
pub fn validate_username(name: &str) -> Result<()> {
    if name.len() < USERNAME_MIN_LENGTH || name.len() > USERNAME_MAX_LENGTH {
        return Err(GridMatchError::ValidationError(format!(
            "Username must be {} to {} characters",
            USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GridMatchError::ValidationError(
            "Username may only contain letters, numbers and underscores".to_string(),
        ));
    }
    Ok(())
}
