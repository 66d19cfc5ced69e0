//! Quote domain — per-symbol price state and display rows.

pub mod state;
pub mod wire;

use crate::shared::{fmt, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest known quote fields for one symbol.
///
/// `last` stays absent until the first delta carrying it arrives. No
/// staleness timestamp is tracked; freshness is scoped by membership in the
/// currently streamed watchlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteEntry {
    pub last: Option<Decimal>,
    pub change: Decimal,
    pub pct_change: Decimal,
}

/// Price movement direction, for view styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// A display row: one member symbol of the selected watchlist joined with
/// its quote (default-zero when no delta has arrived yet).
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub symbol: Symbol,
    pub quote: QuoteEntry,
}

impl QuoteRow {
    /// Last price, `"-"` until the first delta arrives.
    pub fn last_display(&self) -> String {
        match self.quote.last {
            Some(last) => fmt::fixed2(last),
            None => "-".to_string(),
        }
    }

    /// Change cell: `+2.00 (+0.67%)`.
    pub fn change_display(&self) -> String {
        fmt::change_cell(self.quote.change, self.quote.pct_change)
    }

    pub fn direction(&self) -> Direction {
        if self.quote.pct_change.is_sign_positive() && !self.quote.pct_change.is_zero() {
            Direction::Up
        } else if self.quote.pct_change.is_sign_negative() {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(last: Option<&str>, change: &str, pct: &str) -> QuoteRow {
        QuoteRow {
            symbol: Symbol::new("MSFT"),
            quote: QuoteEntry {
                last: last.map(|v| Decimal::from_str(v).unwrap()),
                change: Decimal::from_str(change).unwrap(),
                pct_change: Decimal::from_str(pct).unwrap(),
            },
        }
    }

    #[test]
    fn test_display_before_first_delta() {
        let r = row(None, "0", "0");
        assert_eq!(r.last_display(), "-");
        assert_eq!(r.change_display(), "0.00 (0.00%)");
        assert_eq!(r.direction(), Direction::Flat);
    }

    #[test]
    fn test_display_after_delta() {
        let r = row(Some("300"), "2", "0.67");
        assert_eq!(r.last_display(), "300.00");
        assert_eq!(r.change_display(), "+2.00 (+0.67%)");
        assert_eq!(r.direction(), Direction::Up);
    }

    #[test]
    fn test_negative_direction() {
        let r = row(Some("99.5"), "-0.5", "-0.5");
        assert_eq!(r.direction(), Direction::Down);
    }
}
