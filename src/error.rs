use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GridMatchError {
    // Input validation errors
    ValidationError(String),

    // Game state machine errors
    GameStateError(String),

    // Protocol errors
    ProtocolError(String),

    // Admission control errors
    AdmissionError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for GridMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::GameStateError(msg) => write!(f, "Game state error: {}", msg),
            Self::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
            Self::AdmissionError(msg) => write!(f, "Admission denied: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for GridMatchError {}

// Generic result type for gridmatch
pub type Result<T> = std::result::Result<T, GridMatchError>;
