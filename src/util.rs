// Field parsers and number formatting.
//
// Parsers are strict: a value that does not parse cleanly is reported as an
// error by the caller instead of being skipped, so a bad cell can never
// quietly change a financial summary.
use num_format::{Locale, ToFormattedString};

/// Currency code printed in front of every profit amount.
pub const CURRENCY: &str = "SGD";

/// Parse a percentage cell.
///
/// - Trims whitespace.
/// - Rejects anything containing letters, which rules out `inf`, `NaN` and
///   exponent notation.
/// - Rejects negative values.
pub fn parse_percentage(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("percentage is empty".to_string());
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(format!("'{}' is not a decimal number", s));
    }
    let v: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a decimal number", s))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("percentage {} must be zero or positive", s));
    }
    Ok(v)
}

pub fn parse_day(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let day: u32 = s
        .parse()
        .map_err(|_| format!("day '{}' is not a whole number", s))?;
    if day == 0 {
        return Err("day must be positive".to_string());
    }
    Ok(day)
}

pub fn parse_amount(s: &str) -> Result<i64, String> {
    let s = s.trim();
    s.parse::<i64>()
        .map_err(|_| format!("net profit '{}' is not a whole number", s))
}

/// Render a percentage the way it was written: shortest form that reads
/// back to the same value, always with a decimal point (`40.0`, `44.5`).
pub fn format_percentage(v: f64) -> String {
    let s = v.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

pub fn format_currency(amount: u128) -> String {
    // No thousands separators: amounts are printed as plain integers.
    format!("{}{}", CURRENCY, amount)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Only used for console counts (e.g. `1,024 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
