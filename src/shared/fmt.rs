//! Decimal formatting utilities for human-readable display.
//!
//! Quote rows render with fixed two decimal places and thousands
//! separators (`1,234.50`), with changes carrying an explicit sign
//! (`+2.00 (+0.67%)`).

use rust_decimal::Decimal;

/// Format with two decimal places and thousands separators.
pub fn fixed2(value: Decimal) -> String {
    group_thousands(format!("{:.2}", value))
}

/// Format with two decimal places, a leading `+` for positive values.
pub fn signed2(value: Decimal) -> String {
    let formatted = fixed2(value);
    if value.is_sign_positive() && !value.is_zero() {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

/// Render a change cell: `+2.00 (+0.67%)`.
pub fn change_cell(change: Decimal, pct_change: Decimal) -> String {
    format!("{} ({}%)", signed2(change), signed2(pct_change))
}

/// Insert thousands separators into an already-formatted decimal string.
fn group_thousands(formatted: String) -> String {
    let (number, fraction) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match fraction {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_fixed2_pads_and_groups() {
        assert_eq!(fixed2(dec("300")), "300.00");
        assert_eq!(fixed2(dec("1234.5")), "1,234.50");
        assert_eq!(fixed2(dec("1234567.891")), "1,234,567.89");
    }

    #[test]
    fn test_fixed2_negative() {
        assert_eq!(fixed2(dec("-1234.5")), "-1,234.50");
    }

    #[test]
    fn test_signed2_positive_gets_plus() {
        assert_eq!(signed2(dec("2")), "+2.00");
        assert_eq!(signed2(dec("-1.25")), "-1.25");
        assert_eq!(signed2(dec("0")), "0.00");
    }

    #[test]
    fn test_change_cell() {
        assert_eq!(change_cell(dec("2"), dec("0.67")), "+2.00 (+0.67%)");
        assert_eq!(change_cell(dec("-0.5"), dec("-0.33")), "-0.50 (-0.33%)");
        assert_eq!(change_cell(dec("0"), dec("0")), "0.00 (0.00%)");
    }
}
