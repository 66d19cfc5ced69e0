//! Quote store — app-owned, SDK-provided update logic.

use super::wire::QuoteDelta;
use super::{QuoteEntry, QuoteRow};
use crate::domain::watchlist::Watchlist;
use crate::shared::Symbol;
use std::collections::HashMap;

/// Latest quote per symbol, fed by the stream session.
///
/// The key space is global by symbol and shared by successive stream
/// bindings; entries are never evicted. Entries for symbols outside the
/// selected watchlist are harmless leftovers — [`QuoteBoard::rows`] filters
/// by membership at read time, so they never surface against the wrong
/// watchlist.
#[derive(Debug, Clone, Default)]
pub struct QuoteBoard {
    entries: HashMap<Symbol, QuoteEntry>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a delta field-by-field: fields absent from the delta keep
    /// their stored value, they are not reset.
    pub fn apply(&mut self, updates: &HashMap<Symbol, QuoteDelta>) {
        for (symbol, delta) in updates {
            let entry = self.entries.entry(symbol.clone()).or_default();
            if let Some(last) = delta.last {
                entry.last = Some(last);
            }
            if let Some(change) = delta.change {
                entry.change = change;
            }
            if let Some(pct_change) = delta.pct_change {
                entry.pct_change = pct_change;
            }
        }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&QuoteEntry> {
        self.entries.get(symbol)
    }

    /// Display rows for a watchlist, in its symbol order. Symbols without
    /// a stored quote get a default entry; stored quotes for non-members
    /// are excluded.
    pub fn rows(&self, watchlist: &Watchlist) -> Vec<QuoteRow> {
        watchlist
            .symbols
            .iter()
            .map(|symbol| QuoteRow {
                symbol: symbol.clone(),
                quote: self.entries.get(symbol).cloned().unwrap_or_default(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
