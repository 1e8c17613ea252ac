//! Number formatting shared by the display and the history ledger
//!
//! The display text and the persisted history lines use the same textual
//! conventions as a browser calculator: shortest round-trip numbers with
//! exponent notation outside `[1e-6, 1e21)`, four fixed decimals for history
//! results, and ten significant digits when the display overflows.

use serde::{Deserialize, Serialize};

/// Display text shown after a failed calculation
pub const ERROR_SENTINEL: &str = "Error";

/// Decimal places used for results in history lines
pub const HISTORY_DECIMALS: usize = 4;

/// Formats a number the way `Number.prototype.toString` does.
#[must_use]
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", number_to_string(-value));
    }

    let (digits, exponent) = shortest_digits(value);
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let sign = if e >= 0 { '+' } else { '-' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{head}e{sign}{}", e.abs())
        } else {
            format!("{head}.{tail}e{sign}{}", e.abs())
        }
    }
}

/// Formats a number with a fixed number of decimals (`toFixed`).
///
/// Exact ties round away from zero, and magnitudes of `1e21` and above fall
/// back to [`number_to_string`].
#[must_use]
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return number_to_string(value);
    }
    // -0 formats without a sign
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let body = match exact_tie(magnitude, decimals) {
        Some(truncated) => increment_last_digit(&truncated),
        None => format!("{magnitude:.decimals$}"),
    };
    format!("{sign}{body}")
}

/// Formats a number with `precision` significant digits (`toPrecision`).
#[must_use]
pub fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if !value.is_finite() {
        return number_to_string(value);
    }
    if value == 0.0 {
        return if precision > 1 {
            format!("0.{}", "0".repeat(precision - 1))
        } else {
            "0".to_string()
        };
    }
    if value < 0.0 {
        return format!("-{}", to_precision(-value, precision));
    }

    let formatted = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = split_exponent(&formatted);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let p = precision as i32;

    if exponent < -6 || exponent >= p {
        let sign = if exponent >= 0 { '+' } else { '-' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{head}e{sign}{}", exponent.abs())
        } else {
            format!("{head}.{tail}e{sign}{}", exponent.abs())
        }
    } else if exponent >= 0 {
        let (int, frac) = digits.split_at((exponent + 1) as usize);
        if frac.is_empty() {
            int.to_string()
        } else {
            format!("{int}.{frac}")
        }
    } else {
        format!("0.{}{digits}", "0".repeat((-exponent - 1) as usize))
    }
}

/// Parses display text into a number. Returns `None` for the error sentinel
/// or anything that is not a number.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    if text == ERROR_SENTINEL {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Display overflow rule: text longer than `max_len` characters is shown
/// with `precision` significant digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayFormat {
    /// Longest display text shown verbatim
    pub max_len: usize,
    /// Significant digits used once `max_len` is exceeded
    pub precision: usize,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            max_len: Self::DEFAULT_MAX_LEN,
            precision: Self::DEFAULT_PRECISION,
        }
    }
}

impl DisplayFormat {
    /// Default longest verbatim display
    pub const DEFAULT_MAX_LEN: usize = 15;
    /// Default significant digits on overflow
    pub const DEFAULT_PRECISION: usize = 10;

    /// Renders display text for the screen
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        if text.chars().count() <= self.max_len {
            return text.to_string();
        }
        match parse_number(text) {
            Some(value) => to_precision(value, self.precision),
            None => text.to_string(),
        }
    }
}

/// Shortest round-trip digits and decimal exponent of a positive finite value
fn shortest_digits(value: f64) -> (String, i32) {
    let formatted = format!("{value:e}");
    let (mantissa, exponent) = split_exponent(&formatted);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    (digits.to_string(), exponent)
}

fn split_exponent(formatted: &str) -> (&str, i32) {
    match formatted.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (formatted, 0),
    }
}

/// Detects a value that sits exactly halfway between two representable
/// results at `decimals` places. Returns the text truncated to `decimals`.
fn exact_tie(magnitude: f64, decimals: usize) -> Option<String> {
    let wide = format!("{magnitude:.prec$}", prec = decimals + 1);
    if !wide.ends_with('5') {
        return None;
    }
    // A tie needs the wider text to be exact, not merely the nearest rounding.
    match wide.parse::<f64>() {
        Ok(parsed) if parsed == magnitude && is_exact_decimal(magnitude, decimals + 1) => {
            let mut truncated = wide;
            truncated.pop();
            if truncated.ends_with('.') {
                truncated.pop();
            }
            Some(truncated)
        }
        _ => None,
    }
}

/// True when `magnitude` has a terminating binary fraction that fits in
/// `places` decimal digits.
fn is_exact_decimal(magnitude: f64, places: usize) -> bool {
    // A decimal with `places` digits is exact in binary only if it is a
    // multiple of 2^-places.
    let scale = 2f64.powi(places as i32);
    let scaled = magnitude * scale;
    scaled.is_finite() && scaled.fract() == 0.0
}

/// Adds one unit in the last place of a non-negative decimal string.
fn increment_last_digit(text: &str) -> String {
    let mut bytes: Vec<u8> = text.bytes().collect();
    let mut i = bytes.len();
    while i > 0 {
        i -= 1;
        match bytes[i] {
            b'.' => continue,
            b'9' => bytes[i] = b'0',
            d => {
                bytes[i] = d + 1;
                return String::from_utf8(bytes).unwrap_or_default();
            }
        }
    }
    let mut carried = String::from("1");
    carried.push_str(&String::from_utf8(bytes).unwrap_or_default());
    carried
}
