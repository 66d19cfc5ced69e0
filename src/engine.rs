//! The sync engine — reconciles three independently-changing sources of
//! truth: the server-held watchlist set (REST), the live quote stream
//! (WebSocket, one watchlist at a time), and local user intents.
//!
//! Single-owner, no locks: every operation runs to a well-defined
//! suspension point on the caller's task, and stream events are applied
//! one at a time through [`SyncEngine::apply_event`]. Ordering across
//! suspension points is enforced by the session's binding tags, not by
//! timing.
//!
//! Control flow:
//! - selection intent → registry confirms the id → session tears down the
//!   old stream and opens the new one
//! - mutation intent → server call → full registry reload → selection
//!   fallback → (only if the selected id itself changed) stream re-bind
//! - stream delta → session stale-guard → quote store merge

use crate::client::WatchlistsClient;
use crate::domain::quote::state::QuoteBoard;
use crate::domain::quote::QuoteRow;
use crate::domain::watchlist::state::{LoadState, WatchlistRegistry};
use crate::domain::watchlist::Watchlist;
use crate::error::SdkError;
use crate::shared::WatchlistId;
use crate::ws::session::{SessionOutcome, SessionStatus, StreamSession};
use crate::ws::TaggedEvent;
use tokio::sync::mpsc;

/// Capacity of the stream event queue. Deltas arrive once a minute per
/// watchlist; this only needs to absorb bursts during rebinds.
const EVENT_QUEUE_CAPACITY: usize = 256;

/// The client-side reconciliation core.
///
/// The view layer consumes this through the read interface (`registry`,
/// `rows`, `session_status`, `mutation_in_flight`) and feeds it intents
/// (`select`, `add_symbol`, `remove_symbol`, `load_watchlists`).
pub struct SyncEngine {
    client: WatchlistsClient,
    registry: WatchlistRegistry,
    quotes: QuoteBoard,
    session: StreamSession,
    events_rx: mpsc::Receiver<TaggedEvent>,
    mutation_in_flight: bool,
}

impl SyncEngine {
    pub fn new(client: WatchlistsClient) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let session = StreamSession::new(client.ws_config().clone(), events_tx);
        Self {
            client,
            registry: WatchlistRegistry::new(),
            quotes: QuoteBoard::new(),
            session,
            events_rx,
            mutation_in_flight: false,
        }
    }

    // ── Read interface ───────────────────────────────────────────────────

    pub fn registry(&self) -> &WatchlistRegistry {
        &self.registry
    }

    pub fn quotes(&self) -> &QuoteBoard {
        &self.quotes
    }

    pub fn session_status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn selected(&self) -> Option<&Watchlist> {
        self.registry.selected()
    }

    /// Advisory busy flag: the view should hold new mutation submissions
    /// while one is in flight.
    pub fn mutation_in_flight(&self) -> bool {
        self.mutation_in_flight
    }

    /// Display rows for the selected watchlist: its members in server
    /// order, each joined with the latest quote. Quotes held for symbols
    /// outside the selection never appear.
    pub fn rows(&self) -> Vec<QuoteRow> {
        self.registry
            .selected()
            .map(|watchlist| self.quotes.rows(watchlist))
            .unwrap_or_default()
    }

    // ── Loading ──────────────────────────────────────────────────────────

    /// Full reload of the watchlist set, bootstrapping a default watchlist
    /// when the server holds none.
    ///
    /// On success the selection is re-resolved (kept if still present,
    /// else first in server order) and the stream binding is brought in
    /// line with it. On failure the registry surfaces an error state and
    /// keeps its cache; there is no automatic retry.
    pub async fn load_watchlists(&mut self) -> Result<(), SdkError> {
        self.registry.begin_load();
        match self.client.watchlists().load_all().await {
            Ok(watchlists) => {
                let selected = self.registry.apply_loaded(watchlists);
                self.session.bind(selected);
                Ok(())
            }
            Err(e) => {
                self.registry.fail_load(e.to_string());
                Err(e)
            }
        }
    }

    // ── Selection ────────────────────────────────────────────────────────

    /// Select a watchlist. The registry confirms the id exists before the
    /// session rebinds; an unknown id leaves both untouched.
    pub fn select(&mut self, id: WatchlistId) -> Result<(), SdkError> {
        self.registry
            .select(id)
            .map_err(|e| SdkError::Validation(e.to_string()))?;
        self.session.bind(Some(id));
        Ok(())
    }

    /// Drop the selection and close any open stream.
    pub fn clear_selection(&mut self) {
        self.registry.clear_selection();
        self.session.bind(None);
    }

    /// Explicit stream recovery after an unexpected disconnect.
    pub fn reconnect(&mut self) {
        self.session.rebind();
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Add a symbol to a watchlist. Empty input is rejected locally; a
    /// confirmed add triggers a full reload (the stream binding is by id,
    /// so only the filtered row set changes).
    pub async fn add_symbol(&mut self, id: WatchlistId, raw: &str) -> Result<(), SdkError> {
        self.mutate(|client| async move { client.watchlists().add_symbol(id, raw).await.map(|_| ()) })
            .await
    }

    /// Remove a symbol from a watchlist. Same contract as add; removing
    /// the last symbol leaves a valid, empty watchlist and an unchanged
    /// selection.
    pub async fn remove_symbol(&mut self, id: WatchlistId, raw: &str) -> Result<(), SdkError> {
        self.mutate(|client| async move {
            client.watchlists().remove_symbol(id, raw).await.map(|_| ())
        })
        .await
    }

    /// Create a watchlist, then reload to adopt the server's view of it.
    pub async fn create_watchlist(&mut self, name: &str) -> Result<(), SdkError> {
        self.mutate(|client| async move { client.watchlists().create(name).await.map(|_| ()) })
            .await
    }

    /// Delete a watchlist. If it was selected, the reload's fallback rule
    /// moves the selection (and the stream) to the first remaining entry.
    pub async fn delete_watchlist(&mut self, id: WatchlistId) -> Result<(), SdkError> {
        self.mutate(|client| async move { client.watchlists().delete(id).await })
            .await
    }

    /// Shared mutation discipline: mark busy, run the server call, reload
    /// on success. Mutation failures leave registry, session, and quote
    /// store untouched.
    async fn mutate<F, Fut>(&mut self, op: F) -> Result<(), SdkError>
    where
        F: FnOnce(WatchlistsClient) -> Fut,
        Fut: std::future::Future<Output = Result<(), SdkError>>,
    {
        self.mutation_in_flight = true;
        let result = match op(self.client.clone()).await {
            Ok(()) => self.load_watchlists().await,
            Err(e) => Err(e),
        };
        self.mutation_in_flight = false;
        result
    }

    // ── Stream events ────────────────────────────────────────────────────

    /// Next stream event, or `None` if the session side has shut down.
    pub async fn next_event(&mut self) -> Option<TaggedEvent> {
        self.events_rx.recv().await
    }

    /// Route one stream event: the session applies its stale-guard and
    /// status transitions, and confirmed deltas merge into the quote
    /// store.
    pub fn apply_event(&mut self, event: TaggedEvent) -> SessionOutcome {
        let outcome = self.session.handle(event);
        if let SessionOutcome::Updates(updates) = &outcome {
            self.quotes.apply(updates);
        }
        outcome
    }

    /// Convenience for event loops: await, route, and report whether the
    /// channel is still live.
    pub async fn run_once(&mut self) -> Option<SessionOutcome> {
        let event = self.next_event().await?;
        Some(self.apply_event(event))
    }

    /// Loading status shortcut for views.
    pub fn load_state(&self) -> &LoadState {
        self.registry.state()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::wire::QuoteDelta;
    use crate::shared::Symbol;
    use crate::ws::{BindingTag, DeltaPayload, MessageIn, WsEvent};
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // No request leaves the machine in these tests; the addresses just
    // have to be well-formed.
    fn engine() -> SyncEngine {
        let client = WatchlistsClient::builder()
            .base_url("http://127.0.0.1:1")
            .ws_url("ws://127.0.0.1:1")
            .build()
            .unwrap();
        client.sync_engine()
    }

    fn wl(id: i64, name: &str, symbols: &[&str]) -> Watchlist {
        Watchlist {
            id: WatchlistId::new(id),
            name: name.into(),
            symbols: symbols.iter().map(|s| Symbol::new(s)).collect(),
        }
    }

    fn delta_event(tag: BindingTag, entries: &[(&str, &str, &str, &str)]) -> TaggedEvent {
        let updates: HashMap<Symbol, QuoteDelta> = entries
            .iter()
            .map(|(sym, last, change, pct)| {
                (
                    Symbol::new(sym),
                    QuoteDelta {
                        last: Some(dec(last)),
                        change: Some(dec(change)),
                        pct_change: Some(dec(pct)),
                    },
                )
            })
            .collect();
        TaggedEvent {
            tag,
            event: WsEvent::Message(MessageIn::Delta(DeltaPayload { updates })),
        }
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected_without_network() {
        let mut engine = engine();
        // The target address refuses connections, so reaching the server
        // would fail loudly — local rejection must win first.
        let err = engine
            .add_symbol(WatchlistId::new(1), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
        assert!(!engine.mutation_in_flight());
    }

    #[tokio::test]
    async fn test_select_unknown_id_leaves_session_idle() {
        let mut engine = engine();
        engine.registry.apply_loaded(vec![wl(1, "Compras", &[])]);

        let err = engine.select(WatchlistId::new(9)).unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
        assert_eq!(engine.session_status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn test_select_binds_stream_to_id() {
        let mut engine = engine();
        engine
            .registry
            .apply_loaded(vec![wl(1, "Compras", &["AAPL"]), wl(2, "Tech", &["MSFT"])]);
        engine.session.bind(engine.registry.selected_id());

        engine.select(WatchlistId::new(2)).unwrap();
        assert_eq!(engine.session_status(), SessionStatus::Connecting);
        assert_eq!(engine.session.bound_id(), Some(WatchlistId::new(2)));
    }

    #[tokio::test]
    async fn test_end_to_end_rows_scenario() {
        // Two watchlists; select Tech; a MSFT delta arrives; the visible
        // rows show MSFT's quote and never AAPL's.
        let mut engine = engine();
        engine.registry.apply_loaded(vec![
            wl(1, "Compras", &["AAPL"]),
            wl(2, "Tech", &["MSFT", "GOOG"]),
        ]);
        engine.session.bind(engine.registry.selected_id());

        // A quote for AAPL from the initial selection's stream.
        let tag_compras = engine.session.binding_tag().unwrap();
        engine.apply_event(delta_event(tag_compras, &[("AAPL", "150", "1", "0.5")]));

        engine.select(WatchlistId::new(2)).unwrap();
        let tag_tech = engine.session.binding_tag().unwrap();
        engine.apply_event(TaggedEvent {
            tag: tag_tech,
            event: WsEvent::Connected,
        });
        engine.apply_event(delta_event(tag_tech, &[("MSFT", "300", "2", "0.67")]));

        let rows = engine.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, Symbol::new("MSFT"));
        assert_eq!(rows[0].last_display(), "300.00");
        assert_eq!(rows[0].change_display(), "+2.00 (+0.67%)");
        assert_eq!(rows[1].last_display(), "-");
        assert!(rows.iter().all(|r| r.symbol != Symbol::new("AAPL")));
    }

    #[tokio::test]
    async fn test_stale_delta_after_reassignment_is_dropped() {
        let mut engine = engine();
        engine
            .registry
            .apply_loaded(vec![wl(1, "Compras", &["AAPL"]), wl(2, "Tech", &["MSFT"])]);
        engine.session.bind(engine.registry.selected_id());
        let old_tag = engine.session.binding_tag().unwrap();

        engine.select(WatchlistId::new(2)).unwrap();

        let outcome = engine.apply_event(delta_event(old_tag, &[("AAPL", "150", "1", "0.5")]));
        assert!(matches!(outcome, SessionOutcome::Stale));
        assert!(engine.quotes().is_empty(), "stale delta must not be stored");
    }

    #[tokio::test]
    async fn test_disconnect_keeps_quotes_visible() {
        let mut engine = engine();
        engine
            .registry
            .apply_loaded(vec![wl(2, "Tech", &["MSFT"])]);
        engine.session.bind(engine.registry.selected_id());
        let tag = engine.session.binding_tag().unwrap();

        engine.apply_event(delta_event(tag, &[("MSFT", "300", "2", "0.67")]));
        engine.apply_event(TaggedEvent {
            tag,
            event: WsEvent::Disconnected {
                code: None,
                reason: "network".into(),
            },
        });

        assert_eq!(engine.session_status(), SessionStatus::Disconnected);
        assert_eq!(engine.rows()[0].last_display(), "300.00");
    }

    #[tokio::test]
    async fn test_clear_selection_goes_idle_with_empty_rows() {
        let mut engine = engine();
        engine.registry.apply_loaded(vec![wl(1, "Compras", &["AAPL"])]);
        engine.session.bind(engine.registry.selected_id());

        engine.clear_selection();
        assert_eq!(engine.session_status(), SessionStatus::Idle);
        assert!(engine.rows().is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_surfaces_error_state() {
        let mut engine = engine();
        let err = engine.load_watchlists().await.unwrap_err();
        assert!(matches!(err, SdkError::Http(_)));
        assert!(matches!(engine.load_state(), LoadState::Error(_)));
        // Nothing to stream against.
        assert_eq!(engine.session_status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn test_mutation_failure_leaves_state_untouched() {
        let mut engine = engine();
        engine.registry.apply_loaded(vec![wl(1, "Compras", &["AAPL"])]);
        engine.session.bind(engine.registry.selected_id());
        let tag_before = engine.session.binding_tag();

        // The server address refuses connections, so the call fails.
        let err = engine.add_symbol(WatchlistId::new(1), "TSLA").await.unwrap_err();
        assert!(matches!(err, SdkError::Mutation(_)));
        assert!(!engine.mutation_in_flight());
        assert_eq!(engine.registry.watchlists().len(), 1);
        assert_eq!(engine.session.binding_tag(), tag_before);
    }
}
