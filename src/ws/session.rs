//! Stream session manager — at most one live quote stream, bound to the
//! selected watchlist.
//!
//! The manager owns the binding lifecycle: on every change of the selected
//! watchlist id it requests close of the existing connection *before*
//! opening the next one, and it retires the old binding's tag in the same
//! step. Late events from a retired binding are discarded on arrival, so
//! two connections can never write into the quote store under ambiguous
//! attribution, even while the old socket is still draining.

use crate::domain::quote::wire::QuoteDelta;
use crate::shared::{Symbol, WatchlistId};
use crate::ws::native::WsClient;
use crate::ws::{BindingTag, MessageIn, TaggedEvent, WsConfig, WsEvent};
use std::collections::HashMap;
use tokio::sync::mpsc;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Connection status of the current binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No watchlist selected, no connection.
    #[default]
    Idle,
    /// Handshake in flight.
    Connecting,
    /// Messages may arrive.
    Open,
    /// Teardown requested; transient, resolves to `Idle` or `Connecting`.
    Closing,
    /// The connection ended while its watchlist is still selected. No
    /// automatic reconnect — recovery is a new selection or an explicit
    /// rebind.
    Disconnected,
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What handling one event produced. The session never touches the quote
/// store itself; callers apply `Updates` to whatever store they own.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// A delta for the current binding: merge into the quote store.
    Updates(HashMap<Symbol, QuoteDelta>),
    /// Connection acknowledgement — diagnostics only.
    Acknowledged {
        watchlist: Option<WatchlistId>,
        symbols: Vec<Symbol>,
    },
    /// The connection status changed.
    StatusChanged(SessionStatus),
    /// The event belonged to a retired binding and was discarded.
    Stale,
    /// Recognized but irrelevant (e.g. an unknown status string).
    Ignored,
}

// ─── StreamSession ───────────────────────────────────────────────────────────

/// Owner of the single active stream binding.
pub struct StreamSession {
    config: WsConfig,
    events_tx: mpsc::Sender<TaggedEvent>,
    binding: Option<(BindingTag, WsClient)>,
    epoch: u64,
    status: SessionStatus,
}

impl StreamSession {
    pub fn new(config: WsConfig, events_tx: mpsc::Sender<TaggedEvent>) -> Self {
        Self {
            config,
            events_tx,
            binding: None,
            epoch: 0,
            status: SessionStatus::Idle,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The watchlist id the session is currently bound to, if any.
    pub fn bound_id(&self) -> Option<WatchlistId> {
        self.binding.as_ref().map(|(tag, _)| tag.watchlist_id)
    }

    /// Tag of the current binding, if any.
    pub fn binding_tag(&self) -> Option<BindingTag> {
        self.binding.as_ref().map(|(tag, _)| *tag)
    }

    /// Point the session at `target`, tearing down any existing connection
    /// first.
    ///
    /// Re-binding to the id already bound (and not dead) is a no-op — a
    /// membership change alone never requires a new connection, since the
    /// stream is addressed by watchlist id. Use [`StreamSession::rebind`]
    /// to force a fresh connection for the current id.
    pub fn bind(&mut self, target: Option<WatchlistId>) {
        let alive = matches!(
            self.status,
            SessionStatus::Connecting | SessionStatus::Open
        );
        if self.bound_id() == target && (alive || target.is_none()) {
            return;
        }
        self.teardown();
        match target {
            Some(id) => self.open(id),
            None => self.status = SessionStatus::Idle,
        }
    }

    /// Force a fresh connection for the currently bound id.
    ///
    /// This is the explicit recovery path after an unexpected close.
    pub fn rebind(&mut self) {
        let Some(id) = self.bound_id() else {
            return;
        };
        self.teardown();
        self.open(id);
    }

    /// Route one tagged event through the session.
    pub fn handle(&mut self, incoming: TaggedEvent) -> SessionOutcome {
        // Stale-response guard: only the current binding may produce
        // side effects.
        let current = match self.binding_tag() {
            Some(tag) if tag == incoming.tag => tag,
            _ => {
                tracing::debug!(tag = ?incoming.tag, "Discarding event from retired binding");
                return SessionOutcome::Stale;
            }
        };

        match incoming.event {
            WsEvent::Connected => {
                self.status = SessionStatus::Open;
                SessionOutcome::StatusChanged(self.status)
            }
            WsEvent::Disconnected { code, reason } => {
                tracing::warn!(
                    watchlist = %current.watchlist_id,
                    ?code,
                    "Quote stream disconnected: {reason}"
                );
                self.status = SessionStatus::Disconnected;
                SessionOutcome::StatusChanged(self.status)
            }
            WsEvent::Error(reason) => {
                tracing::warn!(
                    watchlist = %current.watchlist_id,
                    "Quote stream failed: {reason}"
                );
                self.status = SessionStatus::Disconnected;
                SessionOutcome::StatusChanged(self.status)
            }
            WsEvent::Message(message) => dispatch(message),
        }
    }

    fn teardown(&mut self) {
        if let Some((tag, mut client)) = self.binding.take() {
            self.status = SessionStatus::Closing;
            tracing::debug!(watchlist = %tag.watchlist_id, epoch = tag.epoch, "Closing quote stream");
            client.close();
        }
    }

    fn open(&mut self, id: WatchlistId) {
        self.epoch += 1;
        let tag = BindingTag {
            watchlist_id: id,
            epoch: self.epoch,
        };
        tracing::debug!(watchlist = %id, epoch = tag.epoch, "Opening quote stream");
        let client = WsClient::open(&self.config, tag, self.events_tx.clone());
        self.binding = Some((tag, client));
        self.status = SessionStatus::Connecting;
    }
}

/// Pure message dispatch: pattern-match recognized shapes into a state
/// update description. Keeping this free of session state makes the merge
/// semantics directly testable.
fn dispatch(message: MessageIn) -> SessionOutcome {
    match message {
        MessageIn::Delta(payload) => SessionOutcome::Updates(payload.updates),
        MessageIn::Status(payload) if payload.status == "connected" => {
            tracing::info!(
                watchlist = ?payload.watchlist,
                symbols = payload.symbols.len(),
                "Stream acknowledged subscription"
            );
            SessionOutcome::Acknowledged {
                watchlist: payload.watchlist,
                symbols: payload.symbols,
            }
        }
        MessageIn::Status(payload) => {
            tracing::debug!(status = %payload.status, "Ignoring unknown stream status");
            SessionOutcome::Ignored
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
