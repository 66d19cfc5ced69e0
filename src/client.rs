//! High-level client — `WatchlistsClient` with nested sub-client accessors.
//!
//! Domain sub-clients live in `domain/<name>/client.rs`; this module keeps
//! the builder, the shared HTTP/WS configuration, and the accessor methods.

use crate::domain::watchlist::client::Watchlists;
use crate::engine::SyncEngine;
use crate::error::SdkError;
use crate::http::WatchlistsHttp;
use crate::ws::WsConfig;

/// The primary entry point for the Watchlists SDK.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct WatchlistsClient {
    pub(crate) http: WatchlistsHttp,
    pub(crate) ws_config: WsConfig,
}

impl WatchlistsClient {
    pub fn builder() -> WatchlistsClientBuilder {
        WatchlistsClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn watchlists(&self) -> Watchlists<'_> {
        Watchlists { client: self }
    }

    /// The WS config used when the engine binds a stream.
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    /// Create a sync engine over this client.
    ///
    /// The engine owns the stream session and the in-memory state; its
    /// lifetime is typically tied to the consuming view's. Each call
    /// returns an independent engine with empty state.
    pub fn sync_engine(&self) -> SyncEngine {
        SyncEngine::new(self.clone())
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct WatchlistsClientBuilder {
    base_url: String,
    ws_url: String,
    connect_timeout_ms: u64,
}

impl Default for WatchlistsClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            ws_url: crate::network::DEFAULT_WS_URL.to_string(),
            connect_timeout_ms: WsConfig::default().connect_timeout_ms,
        }
    }
}

impl WatchlistsClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_url = url.to_string();
        self
    }

    pub fn connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    pub fn build(self) -> Result<WatchlistsClient, SdkError> {
        Ok(WatchlistsClient {
            http: WatchlistsHttp::new(&self.base_url),
            ws_config: WsConfig {
                ws_base: self.ws_url,
                connect_timeout_ms: self.connect_timeout_ms,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::WatchlistId;

    #[test]
    fn test_builder_defaults() {
        let client = WatchlistsClient::builder().build().unwrap();
        assert_eq!(client.http.base_url(), crate::network::DEFAULT_API_URL);
        assert_eq!(client.ws_config().ws_base, crate::network::DEFAULT_WS_URL);
    }

    #[test]
    fn test_builder_overrides() {
        let client = WatchlistsClient::builder()
            .base_url("http://10.0.0.5:9000/")
            .ws_url("ws://10.0.0.5:9000")
            .connect_timeout_ms(5_000)
            .build()
            .unwrap();
        assert_eq!(client.http.base_url(), "http://10.0.0.5:9000");
        assert_eq!(
            client.ws_config().url_for(WatchlistId::new(1)),
            "ws://10.0.0.5:9000/ws/watchlists/1"
        );
        assert_eq!(client.ws_config().connect_timeout_ms, 5_000);
    }
}
