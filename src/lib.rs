//! gridmatch - a real-time matchmaking and game session server
//!
//! Pairs connected players into two-party tic-tac-toe sessions and
//! relays validated moves between them over WebSocket.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
