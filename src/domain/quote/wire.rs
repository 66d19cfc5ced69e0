//! Wire types for streamed quote deltas.

use crate::shared::serde_util::lenient_decimal;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Partial quote fields for one symbol inside a delta message.
///
/// Every field is optional; absent fields leave the stored entry unchanged.
/// The feed occasionally sends non-numeric placeholders (`"N/A"`, `"Error"`)
/// for `last` — those deserialize as absent rather than failing the message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuoteDelta {
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub last: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub change: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub pct_change: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_delta() {
        let delta: QuoteDelta =
            serde_json::from_str(r#"{"last": 300, "change": 2, "pct_change": 0.67}"#).unwrap();
        assert_eq!(delta.last, Some(dec("300")));
        assert_eq!(delta.change, Some(dec("2")));
        assert_eq!(delta.pct_change, Some(dec("0.67")));
    }

    #[test]
    fn test_partial_delta() {
        let delta: QuoteDelta = serde_json::from_str(r#"{"last": 150.0}"#).unwrap();
        assert_eq!(delta.last, Some(dec("150")));
        assert_eq!(delta.change, None);
        assert_eq!(delta.pct_change, None);
    }

    #[test]
    fn test_placeholder_last_is_absent() {
        let delta: QuoteDelta =
            serde_json::from_str(r#"{"last": "N/A", "change": 0.0, "pct_change": 0.0}"#).unwrap();
        assert_eq!(delta.last, None);
        assert_eq!(delta.change, Some(dec("0")));
    }
}
