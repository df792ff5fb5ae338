//! Number formatting shared by the counters and the debug handle.
//!
//! Counters pick their format from the *target* value, not the value being
//! shown, so a counter heading for 2,500,000 renders "0.1M", "0.2M", ... from
//! its very first tick.

/// Group an integer's digits in threes using `separator`.
///
/// `1500` becomes `"1,500"` with `','` and `1234567` becomes `"1.234.567"`
/// with `'.'`.
pub fn group_thousands(n: u64, separator: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// One-decimal rendering with ties rounded up, the way `Number#toFixed(1)`
/// treats positive values. Returns (whole, tenths).
fn to_fixed_1(x: f64) -> (u64, u64) {
    let scaled = (x * 10.0).round().max(0.0) as u64;
    (scaled / 10, scaled % 10)
}

/// Render a counter value against its target.
///
/// - target >= 1,000,000: millions with one decimal and an `M` suffix; a
///   rendering ending in `.0` falls back to the floored whole millions
/// - target >= 1,000: floored value with grouped thousands
/// - otherwise: floored value
pub fn format_counter(value: f64, target: u64, separator: char) -> String {
    let value = value.max(0.0);
    if target >= 1_000_000 {
        let millions = value / 1_000_000.0;
        match to_fixed_1(millions) {
            (_, 0) => format!("{}M", millions.floor() as u64),
            (whole, tenths) => format!("{}.{}M", whole, tenths),
        }
    } else if target >= 1_000 {
        group_thousands(value.floor() as u64, separator)
    } else {
        (value.floor() as u64).to_string()
    }
}

/// Leading-integer parse in the manner of `parseInt`: skips leading
/// whitespace, accepts an optional sign, stops at the first non-digit.
/// `"75%"` parses as 75, `"abc"` as `None`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a non-negative integer, rejecting anything `parse_leading_int`
/// would not accept or that comes out negative.
pub fn parse_count(s: &str) -> Option<u64> {
    parse_leading_int(s).and_then(|n| u64::try_from(n).ok())
}
