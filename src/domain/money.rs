use thiserror::Error;

/// Amounts are held as integer cents so sums stay exact.
/// 1 unit = 100 cents, so ₹50.00 = 5000 cents.
pub type Cents = i64;

/// Largest amount a single transaction may carry: 10 trillion currency units.
/// Below 2^51, so amounts survive the decimal-units storage format exactly
/// and sums of realistic ledgers stay far from `i64` limits.
pub const MAX_CENTS: Cents = 1_000_000_000_000_000;

/// Currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Format cents as a plain two-decimal number.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents with a currency symbol, sign first.
/// Example: ("₹", -1200) -> "-₹12.00"
pub fn format_money(symbol: &str, cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, format_cents(cents.saturating_abs()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount format: {0}")]
    InvalidFormat(String),
    #[error("amount is too large")]
    Overflow,
}

/// Parse a decimal string into cents, rounding to the nearest cent.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "0.005" -> 1
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let invalid = || ParseCentsError::InvalidFormat(trimmed.to_string());

    let (units_str, fraction_str) = digits.split_once('.').unwrap_or((digits, ""));
    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !fraction_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let mut fraction = fraction_str.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction.next().unwrap_or(0);
    let hundredths = fraction.next().unwrap_or(0);
    let round_up = fraction.next().is_some_and(|d| d >= 5);

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .ok_or(ParseCentsError::Overflow)?;

    Ok(if negative { -cents } else { cents })
}

/// Converts cents to fractional currency units for the persisted format.
pub fn cents_to_units(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Converts fractional currency units (as written by the persisted format)
/// to the nearest whole cent. Returns `None` for non-finite or out-of-range values.
pub fn units_to_cents(units: f64) -> Option<Cents> {
    let cents = (units * 100.0).round();
    if cents.is_finite() && cents.abs() < i64::MAX as f64 {
        Some(cents as Cents)
    } else {
        None
    }
}

/// Serde adapter storing cents as a decimal number of currency units.
pub mod units {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::{Cents, cents_to_units, units_to_cents};

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cents_to_units(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let units = f64::deserialize(deserializer)?;
        units_to_cents(units).ok_or_else(|| D::Error::custom(format!("invalid amount: {units}")))
    }
}
