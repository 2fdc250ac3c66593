//! Core functionality for the matchmaking server

pub mod connection;
pub mod coordinator;
pub mod game;
pub mod matchmaker;
pub mod message_types;
pub mod rate_limiter;
pub mod registry;

// Re-export main components for convenience
pub use connection::Connection;
pub use coordinator::{create_coordinator, Coordinator, SharedCoordinator};
pub use game::{GameSession, SessionStatus, Symbol};
pub use matchmaker::{EvictionTimer, Matchmaker, WaitingEntry};
pub use message_types::{ClientMessage, ServerMessage};
pub use rate_limiter::ConnectionLimiter;
pub use registry::Registry;
