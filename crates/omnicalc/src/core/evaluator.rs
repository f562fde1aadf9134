//! Two-operand evaluation and operand text conversion
//!
//! Operands live as decimal text in the calculator state. This module is the
//! only place that converts between that text and `f64`.

use crate::core::Operator;

/// Display string for any failed numeric result
pub const ERROR: &str = "Error";

/// Significant digits kept when rounding a computed result
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Evaluates `a op b`.
///
/// With no operator the right-hand operand is returned unchanged.
#[must_use]
pub fn evaluate(a: f64, b: f64, op: Option<Operator>) -> f64 {
    match op {
        Some(op) => op.apply(a, b),
        None => b,
    }
}

/// Rounds to [`SIGNIFICANT_DIGITS`] significant digits.
///
/// Suppresses binary floating-point noise such as `0.1 + 0.2`.
#[must_use]
pub fn round_significant(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    let precision = SIGNIFICANT_DIGITS - 1;
    format!("{value:.precision$e}").parse().unwrap_or(value)
}

/// Formats a computed result for the display.
///
/// The value is rounded to twelve significant digits first. Non-finite
/// values become [`ERROR`].
#[must_use]
pub fn format_result(value: f64) -> String {
    format_number(round_significant(value))
}

/// Formats a number as the shortest decimal text that round-trips.
///
/// Magnitudes of at least `1e21` or below `1e-6` use exponent notation
/// (`1e+21`, `1.5e-7`). Negative zero prints as `0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

/// Parses the longest numeric prefix of `text`.
///
/// Leading whitespace is skipped. Text without a numeric prefix, such as
/// [`ERROR`], yields NaN.
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        digits += frac_end - (end + 1);
        end = frac_end;
    }
    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_end = skip_digits(bytes, exp_end);
        if exp_digits_end > exp_end {
            end = exp_digits_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

/// Turns free-form result text into an operand.
///
/// Used for AI answers and recalled history entries. Grouping commas are
/// dropped, then the first number in the text is taken (`"x = -4"` gives
/// `-4`, `"1,234.5 apples"` gives `1234.5`). Text with no number becomes
/// [`ERROR`].
#[must_use]
pub fn normalize_operand(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let bytes = cleaned.as_bytes();

    let start = (0..bytes.len()).find(|&i| {
        let next_is_digit = |j: usize| bytes.get(j).is_some_and(u8::is_ascii_digit);
        match bytes[i] {
            b'0'..=b'9' => true,
            b'.' => next_is_digit(i + 1),
            b'-' | b'+' => {
                next_is_digit(i + 1) || (bytes.get(i + 1) == Some(&b'.') && next_is_digit(i + 2))
            }
            _ => false,
        }
    });

    match start {
        Some(start) => format_result(parse_number(&cleaned[start..])),
        None => ERROR.to_string(),
    }
}

/// Returns true if `text` is a well-formed operand.
///
/// Well-formed means [`ERROR`], or an optional `-`, digits with at most one
/// `.`, and an optional exponent suffix such as `e+21`.
#[must_use]
pub fn is_valid_operand(text: &str) -> bool {
    if text == ERROR {
        return true;
    }
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let int_part = parts.next().unwrap_or_default();
    let frac_part = parts.next().unwrap_or_default();
    let mantissa_ok = !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit());

    let exponent_ok = exponent.map_or(true, |e| {
        let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    });

    mantissa_ok && exponent_ok
}
