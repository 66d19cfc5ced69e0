//! Conversion: WatchlistRecord → Watchlist (TryFrom + validation).

use super::wire::WatchlistRecord;
use super::{ValidationError, Watchlist};
use crate::shared::Symbol;
use std::collections::HashSet;

impl TryFrom<WatchlistRecord> for Watchlist {
    type Error = ValidationError;

    fn try_from(source: WatchlistRecord) -> Result<Self, Self::Error> {
        if source.name.trim().is_empty() {
            return Err(ValidationError::NameMissing(source.id));
        }

        // The server is authoritative for uniqueness; dedupe defensively,
        // keeping first occurrence in server order.
        let mut seen: HashSet<Symbol> = HashSet::with_capacity(source.symbols.len());
        let symbols = source
            .symbols
            .into_iter()
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();

        Ok(Watchlist {
            id: source.id,
            name: source.name,
            symbols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::WatchlistId;

    fn record(id: i64, name: &str, symbols: &[&str]) -> WatchlistRecord {
        WatchlistRecord {
            id: WatchlistId::new(id),
            user_id: Some("local".into()),
            name: name.into(),
            symbols: symbols.iter().map(|s| Symbol::new(s)).collect(),
        }
    }

    #[test]
    fn test_convert_keeps_server_order() {
        let wl = Watchlist::try_from(record(1, "Tech", &["MSFT", "GOOG", "AAPL"])).unwrap();
        assert_eq!(
            wl.symbols,
            vec![Symbol::new("MSFT"), Symbol::new("GOOG"), Symbol::new("AAPL")]
        );
    }

    #[test]
    fn test_convert_dedupes_symbols() {
        let wl = Watchlist::try_from(record(1, "Tech", &["AAPL", "aapl", "MSFT"])).unwrap();
        assert_eq!(wl.symbols, vec![Symbol::new("AAPL"), Symbol::new("MSFT")]);
    }

    #[test]
    fn test_convert_rejects_empty_name() {
        let err = Watchlist::try_from(record(3, "  ", &[])).unwrap_err();
        assert!(matches!(err, ValidationError::NameMissing(id) if id == WatchlistId::new(3)));
    }

    #[test]
    fn test_empty_symbol_set_is_valid() {
        let wl = Watchlist::try_from(record(1, "Compras", &[])).unwrap();
        assert!(wl.is_empty());
    }
}
