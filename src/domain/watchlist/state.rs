//! Watchlist registry — app-owned state container, SDK-provided update logic.

use super::Watchlist;
use crate::shared::WatchlistId;
use thiserror::Error;

/// Registry load status, distinguishable so the view can decide what to
/// render: previously-loaded data stays visible through `Loading` and
/// `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No load attempted yet.
    #[default]
    Idle,
    /// A full reload is in flight.
    Loading,
    /// The cache reflects the last successful load.
    Ready,
    /// The last load failed; no automatic retry.
    Error(String),
}

/// Returned by [`WatchlistRegistry::select`] for an id the registry does
/// not hold.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown watchlist id: {0}")]
pub struct UnknownWatchlist(pub WatchlistId);

/// In-memory cache of all watchlist records, and the source of truth for
/// which watchlist is selected.
///
/// Reloads are full replacements — the server is the sole writer, so no
/// incremental merging is attempted.
#[derive(Debug, Clone, Default)]
pub struct WatchlistRegistry {
    state: LoadState,
    watchlists: Vec<Watchlist>,
    selected: Option<WatchlistId>,
}

impl WatchlistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// All cached watchlists, in server-returned order.
    pub fn watchlists(&self) -> &[Watchlist] {
        &self.watchlists
    }

    pub fn get(&self, id: WatchlistId) -> Option<&Watchlist> {
        self.watchlists.iter().find(|wl| wl.id == id)
    }

    pub fn selected_id(&self) -> Option<WatchlistId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Watchlist> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.watchlists.is_empty()
    }

    /// Mark a reload as in flight. Cached data stays visible.
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Record a failed load. Cached data and selection are untouched.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.state = LoadState::Error(message.into());
    }

    /// Replace the entire cache with a freshly loaded set and re-resolve
    /// the selection: the current id is kept if still present, otherwise
    /// selection falls back to the first entry in server order, or to none
    /// for an empty set.
    ///
    /// Returns the post-reload selected id so callers can decide whether
    /// the stream binding needs to change.
    pub fn apply_loaded(&mut self, watchlists: Vec<Watchlist>) -> Option<WatchlistId> {
        self.watchlists = watchlists;
        self.state = LoadState::Ready;

        let still_present = self
            .selected
            .map_or(false, |id| self.watchlists.iter().any(|wl| wl.id == id));
        if !still_present {
            self.selected = self.watchlists.first().map(|wl| wl.id);
        }
        self.selected
    }

    /// Select a watchlist by id; fails if the id is not in the cache.
    pub fn select(&mut self, id: WatchlistId) -> Result<(), UnknownWatchlist> {
        if self.get(id).is_none() {
            return Err(UnknownWatchlist(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Drop the selection entirely.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
