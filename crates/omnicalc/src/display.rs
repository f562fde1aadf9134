//! Display formatting
//!
//! Numbers are grouped only here, at the render boundary. The reducer never
//! sees the separators.

use crate::core::{CalculatorState, ERROR};

/// Inserts thousands separators into the integer digits of `text`.
///
/// Sign, fraction and exponent are left as they are; `"Error"` is returned
/// unchanged.
#[must_use]
pub fn group_thousands(text: &str) -> String {
    if text.is_empty() || text == ERROR {
        return text.to_string();
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let (int_digits, tail) = unsigned.split_at(digits_end);

    let mut grouped = String::with_capacity(text.len() + int_digits.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(tail);
    grouped
}

/// The main display line
#[must_use]
pub fn value_line(state: &CalculatorState) -> String {
    group_thousands(state.current_value())
}

/// The small line above the display: `"1,200 ×"` while an operation is
/// pending, empty otherwise
#[must_use]
pub fn expression_line(state: &CalculatorState) -> String {
    match (state.previous_value(), state.operator()) {
        (Some(previous), Some(op)) => format!("{} {op}", group_thousands(previous)),
        _ => String::new(),
    }
}
