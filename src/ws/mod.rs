//! WebSocket layer — messages, events, session management.
//!
//! The quote stream is addressed per watchlist: one logical channel per
//! selected watchlist id, opened at `{ws_base}/ws/watchlists/{id}`. There
//! is no outbound message protocol — subscription is expressed entirely by
//! the connection URL, and teardown is a transport-level close.
//!
//! - `native.rs` — the `tokio-tungstenite` transport, one task per connection
//! - `session.rs` — the stream session manager (binding state machine)

pub mod native;
pub mod session;

use crate::domain::quote::wire::QuoteDelta;
use crate::shared::{Symbol, WatchlistId};
use serde::Deserialize;
use std::collections::HashMap;

// ─── Inbound messages ────────────────────────────────────────────────────────

/// A parsed inbound message from the quote stream.
///
/// The feed carries no type tag; shapes are discriminated by their fields.
/// Text that parses as neither shape is discarded by the transport without
/// terminating the connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageIn {
    /// Per-symbol price deltas: `{"updates": {"SYM": {last?, change?, pct_change?}}}`.
    Delta(DeltaPayload),
    /// Connection acknowledgement: `{"status": "connected", "watchlist": id, "symbols": [..]}`.
    /// Informational only; the merge path does not depend on it.
    Status(StatusPayload),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeltaPayload {
    pub updates: HashMap<Symbol, QuoteDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    #[serde(default)]
    pub watchlist: Option<WatchlistId>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Low-level events emitted by a connection task.
#[derive(Debug, Clone)]
pub enum WsEvent {
    /// Connection established.
    Connected,
    /// A parsed message from the server.
    Message(MessageIn),
    /// Connection lost — server close frame, transport failure, or stream end.
    Disconnected { code: Option<u16>, reason: String },
    /// The connection attempt itself failed.
    Error(String),
}

// ─── Binding tags ────────────────────────────────────────────────────────────

/// Identity of one connection attempt: the watchlist it was opened for plus
/// a monotonically increasing epoch.
///
/// Every event is tagged with the binding it originated from; the session
/// manager discards events whose tag is not the current binding, so a slow
/// teardown can never attribute a late delta to the wrong watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingTag {
    pub watchlist_id: WatchlistId,
    pub epoch: u64,
}

/// A connection event together with the binding that produced it.
#[derive(Debug, Clone)]
pub struct TaggedEvent {
    pub tag: BindingTag,
    pub event: WsEvent,
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Configuration for stream connections.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket base URL; the per-watchlist path is appended at bind time.
    pub ws_base: String,
    /// Handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl WsConfig {
    /// Stream URL for one watchlist.
    pub fn url_for(&self, id: WatchlistId) -> String {
        format!("{}/ws/watchlists/{}", self.ws_base.trim_end_matches('/'), id)
    }
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            ws_base: crate::network::DEFAULT_WS_URL.to_string(),
            connect_timeout_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_parse_delta_message() {
        let msg: MessageIn = serde_json::from_str(
            r#"{"updates": {"MSFT": {"last": 300, "change": 2, "pct_change": 0.67}}}"#,
        )
        .unwrap();
        match msg {
            MessageIn::Delta(payload) => {
                let delta = &payload.updates[&Symbol::new("MSFT")];
                assert_eq!(delta.last, Some(Decimal::from_str("300").unwrap()));
            }
            other => panic!("expected delta, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_status_message() {
        let msg: MessageIn = serde_json::from_str(
            r#"{"status": "connected", "watchlist": 2, "symbols": ["MSFT", "GOOG"]}"#,
        )
        .unwrap();
        match msg {
            MessageIn::Status(payload) => {
                assert_eq!(payload.status, "connected");
                assert_eq!(payload.watchlist, Some(WatchlistId::new(2)));
                assert_eq!(payload.symbols.len(), 2);
            }
            other => panic!("expected status, got: {other:?}"),
        }
    }

    #[test]
    fn test_status_message_minimal_shape() {
        let msg: MessageIn = serde_json::from_str(r#"{"status": "connected"}"#).unwrap();
        assert!(matches!(msg, MessageIn::Status(_)));
    }

    #[test]
    fn test_unrecognized_shapes_fail_to_parse() {
        for raw in [
            r#"{"pong": true}"#,
            r#"{"updates": 5}"#,
            r#"[1, 2, 3]"#,
            r#""hello""#,
        ] {
            assert!(
                serde_json::from_str::<MessageIn>(raw).is_err(),
                "should not parse: {raw}"
            );
        }
    }

    #[test]
    fn test_url_for_watchlist() {
        let config = WsConfig {
            ws_base: "ws://127.0.0.1:8000/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.url_for(WatchlistId::new(3)),
            "ws://127.0.0.1:8000/ws/watchlists/3"
        );
    }
}
