//! Wire types for watchlist requests and responses (REST).

use crate::shared::{Symbol, WatchlistId};
use serde::{Deserialize, Serialize};

/// Raw watchlist record as the backend returns it.
///
/// `user_id` is a backend bookkeeping field; it is preserved here but does
/// not reach the domain type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistRecord {
    pub id: WatchlistId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

/// Body for `POST /watchlists`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateWatchlistRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl CreateWatchlistRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            user_id: None,
        }
    }
}

/// Body for `POST /watchlists/{id}/symbols`.
///
/// Sent as the raw user input (trimmed); the server uppercases before
/// storing, and the response echoes the stored form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolPayload {
    pub symbol: String,
}

/// Response to a successful symbol add: `{"added": "SYM"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolAdded {
    pub added: Symbol,
}

/// Response to a successful symbol removal: `{"removed": "SYM"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolRemoved {
    pub removed: Symbol,
}

/// Response to a successful watchlist deletion: `{"deleted": true}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistDeleted {
    pub deleted: bool,
}
