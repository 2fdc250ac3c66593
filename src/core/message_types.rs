//! Wire format for the matchmaking protocol

use serde::{Deserialize, Serialize};

use crate::core::game::Symbol;

/// Client-to-server message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Set a display name and start searching in one step
    #[serde(rename = "register")]
    Register { username: String },

    /// Enter the matchmaking queue
    #[serde(rename = "findGame")]
    FindGame,

    /// Place a symbol on the board
    #[serde(rename = "move")]
    Move { row: usize, col: usize },
}

/// Server-to-client message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Connection established, identity assigned
    #[serde(rename = "connected")]
    Connected {
        #[serde(rename = "userId")]
        user_id: String,
    },

    /// Public online count changed
    #[serde(rename = "userCount")]
    UserCount { count: usize },

    /// Matchmaking request acknowledged, no opponent yet
    #[serde(rename = "searching")]
    Searching { message: String },

    /// A session was formed
    #[serde(rename = "gameStart")]
    GameStart {
        #[serde(rename = "gameId")]
        game_id: String,
        opponent: String,
        symbol: Symbol,
    },

    /// A validated move was applied to the board
    #[serde(rename = "move")]
    Move {
        row: usize,
        col: usize,
        symbol: Symbol,
        #[serde(rename = "nextTurn")]
        next_turn: bool,
    },

    /// The other participant disconnected
    #[serde(rename = "opponentLeft")]
    OpponentLeft,

    /// Matchmaking gave up waiting for an opponent
    #[serde(rename = "searchTimeout")]
    SearchTimeout { message: String },

    /// Request rejected; the connection stays open
    #[serde(rename = "error")]
    Error { message: String },
}
