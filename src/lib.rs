//! # Watchlists SDK
//!
//! A Rust client SDK for the Watchlists service: named groups of ticker
//! symbols managed over REST, with live per-symbol price deltas streamed
//! over a WebSocket scoped to one watchlist at a time.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared newtypes, domain models, unified errors
//! 2. **HTTP API** — `WatchlistsHttp` with per-endpoint retry policies
//! 3. **WebSocket** — `tokio-tungstenite` transport + the stream session manager
//! 4. **Sync Engine** — `SyncEngine`, reconciling server state, the live
//!    stream, and local user intents behind a single read interface
//! 5. **High-Level Client** — `WatchlistsClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use watchlists_sdk::prelude::*;
//!
//! let client = WatchlistsClient::builder()
//!     .base_url("http://127.0.0.1:8000")
//!     .build()?;
//!
//! let mut engine = client.sync_engine();
//! engine.load_watchlists().await?;
//!
//! while let Some(event) = engine.next_event().await {
//!     engine.apply_event(event);
//!     for row in engine.rows() {
//!         println!("{} {} {}", row.symbol, row.last_display(), row.change_display());
//!     }
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
pub mod http;

// ── Layer 3: WebSocket ───────────────────────────────────────────────────────

/// WebSocket client: messages, events, the stream session manager.
pub mod ws;

// ── Layer 4: Sync Engine ─────────────────────────────────────────────────────

/// The reconciliation core: registry + session + quote store.
pub mod engine;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `WatchlistsClient` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Symbol, WatchlistId};

    // Domain types — watchlist
    pub use crate::domain::watchlist::state::{LoadState, WatchlistRegistry};
    pub use crate::domain::watchlist::{Watchlist, DEFAULT_WATCHLIST_NAME};

    // Domain types — quote
    pub use crate::domain::quote::state::QuoteBoard;
    pub use crate::domain::quote::wire::QuoteDelta;
    pub use crate::domain::quote::{Direction, QuoteEntry, QuoteRow};

    // Wire types — watchlist
    pub use crate::domain::watchlist::wire::WatchlistRecord;

    // Errors
    pub use crate::error::{HttpError, SdkError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_WS_URL};

    // HTTP client + sub-clients
    pub use crate::client::{WatchlistsClient, WatchlistsClientBuilder};
    pub use crate::domain::watchlist::client::Watchlists;
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // WebSocket types
    pub use crate::ws::session::{SessionOutcome, SessionStatus, StreamSession};
    pub use crate::ws::{BindingTag, MessageIn, TaggedEvent, WsConfig, WsEvent};

    // Sync engine
    pub use crate::engine::SyncEngine;
}
