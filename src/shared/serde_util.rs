//! Custom serde helpers for backend wire formats.

/// Deserializes a price field that may be a number, a string, or null.
///
/// The backend's quote feed emits `"last": "N/A"` (or `"Error"`) when it
/// cannot resolve a symbol, and plain JSON numbers otherwise. Unparseable
/// values deserialize as `None` rather than failing the surrounding delta,
/// so one bad symbol never discards the rest of the message.
pub mod lenient_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string()).ok(),
            Some(serde_json::Value::String(s)) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        })
    }
}
