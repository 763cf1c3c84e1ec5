//! Number text helpers shared by the rule tables.
//!
//! Numbers cross the wire as text. Floats use their shortest round-trip
//! form, which may be in scientific notation, so parsing accepts both.
//! Decimals are arbitrary precision: any finite float and any wire number
//! string has an exact decimal counterpart.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::value::Value;

/// Shortest round-trip text for a finite float, `None` for NaN and infinities.
pub fn float_text(f: f64) -> Option<String> {
    if f.is_finite() {
        Some(format!("{:?}", f))
    } else {
        None
    }
}

/// Parses a decimal from plain (`"12.5"`) or scientific (`"1.5e-7"`) notation.
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text.trim()).ok()
}

/// The exact decimal a float stands for on the wire.
pub fn float_to_decimal(f: f64) -> Option<BigDecimal> {
    float_text(f).as_deref().and_then(parse_decimal)
}

/// Wire text for a numeric value; `None` for non-numbers and non-finite floats.
pub fn number_text(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => float_text(*f),
        Value::Decimal(d) => Some(d.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_float_text_keeps_fraction_marker() {
        assert_eq!(float_text(1.0).as_deref(), Some("1.0"));
        assert_eq!(float_text(0.1).as_deref(), Some("0.1"));
        assert_eq!(float_text(-2.5).as_deref(), Some("-2.5"));
        assert_eq!(float_text(f64::NAN), None);
        assert_eq!(float_text(f64::INFINITY), None);
    }

    #[test]
    fn test_parse_decimal_plain_and_scientific() {
        assert_eq!(parse_decimal("0.3"), Some(dec("0.3")));
        assert_eq!(parse_decimal("-17"), Some(BigDecimal::from(-17)));
        assert_eq!(parse_decimal("1e3"), Some(BigDecimal::from(1000)));
        assert_eq!(parse_decimal("not a number"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_parse_decimal_outside_fixed_precision_range() {
        let wide = "12345678901234567890123456789012345678";
        assert_eq!(
            parse_decimal(wide).map(|d| d.to_string()).as_deref(),
            Some(wide)
        );
        assert_eq!(
            parse_decimal("1E+100"),
            Some(dec(&format!("1{}", "0".repeat(100))))
        );
        assert!(parse_decimal("1e-30").is_some_and(|d| d > BigDecimal::from(0)));
    }

    #[test]
    fn test_float_to_decimal_covers_every_finite_float() {
        assert_eq!(float_to_decimal(0.1), Some(dec("0.1")));
        assert_eq!(float_to_decimal(1e30), Some(dec("1000000000000000000000000000000")));
        assert_eq!(float_to_decimal(1e-30), Some(dec("0.000000000000000000000000000001")));
        assert_eq!(float_to_decimal(5e-324), Some(dec("5e-324")));
        assert_eq!(float_to_decimal(f64::MAX), Some(dec("1.7976931348623157e308")));
        assert_eq!(float_to_decimal(f64::NAN), None);
    }

    #[test]
    fn test_number_text() {
        assert_eq!(number_text(&Value::Int(42)).as_deref(), Some("42"));
        assert_eq!(number_text(&Value::Float(1.0)).as_deref(), Some("1.0"));
        assert_eq!(number_text(&Value::Float(1e30)).as_deref(), Some("1e30"));
        assert_eq!(
            number_text(&Value::Decimal(dec("0.30"))).as_deref(),
            Some("0.30")
        );
        assert_eq!(number_text(&Value::Text("1".into())), None);
    }
}
