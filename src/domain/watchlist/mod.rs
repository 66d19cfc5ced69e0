//! Watchlist domain — watchlist types, validation, registry state.

pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{Symbol, WatchlistId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name given to the watchlist created when the server holds none.
pub const DEFAULT_WATCHLIST_NAME: &str = "Compras";

// ─── Watchlist ───────────────────────────────────────────────────────────────

/// A named, server-owned collection of ticker symbols.
///
/// The server is the sole writer: the client never mutates the symbol set
/// speculatively, it re-fetches after every confirmed mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    pub id: WatchlistId,
    pub name: String,
    pub symbols: Vec<Symbol>,
}

impl Watchlist {
    /// Whether `symbol` is a member of this watchlist.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ValidationError {
    NameMissing(WatchlistId),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NameMissing(id) => {
                write!(f, "Watchlist {id} has an empty name")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
