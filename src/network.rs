//! Network URL constants for the Watchlists SDK.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default WebSocket base URL.
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8000";
