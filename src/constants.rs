// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;
pub const WS_PATH: &str = "ws";

// Admission control defaults: refill to full capacity over one window
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
pub const RATE_LIMITER_CLEANUP_INTERVAL_SECS: u64 = 300;

// Matchmaking timing
pub const PRODUCTION_SEARCH_TIMEOUT_SECS: u64 = 30;
pub const DEVELOPMENT_SEARCH_TIMEOUT_SECS: u64 = 60;

// Display name rules
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 20;
pub const ANONYMOUS_NAME: &str = "Anonymous";

// Inbound frames above this size are dropped without a reply
pub const MAX_MESSAGE_SIZE: usize = 2048;

// Client-facing notification texts
pub const SEARCHING_MESSAGE: &str = "Searching for an opponent...";
pub const SEARCH_TIMEOUT_MESSAGE: &str = "No opponent found. Please try again.";
