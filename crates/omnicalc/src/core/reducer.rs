//! Calculator input state machine
//!
//! The pending operand is kept as text so the display shows exactly what was
//! typed (`"0."`, `"12.50"`). Text is converted to a number only when an
//! operation is evaluated.

use tracing::debug;

use crate::core::evaluator::{
    evaluate, format_number, format_result, is_valid_operand, normalize_operand, parse_number,
    ERROR,
};
use crate::core::history::History;
use crate::core::Operator;

/// A single keypad or keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A digit key (0-9)
    Digit(u8),
    /// The decimal point
    Decimal,
    /// A binary operator
    Operator(Operator),
    /// Evaluate the pending operation
    Equals,
    /// Reset everything except history
    Clear,
    /// Negate the current operand
    ToggleSign,
    /// Divide the current operand by 100
    Percent,
    /// Delete the last typed character
    Backspace,
}

impl Event {
    /// Maps a keyboard key name to an event.
    ///
    /// Digits, `.`, `Enter`/`=`, `Escape`, `Backspace` and the operators
    /// `+ - * /` are recognized. Everything else is ignored.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "." => Some(Self::Decimal),
            "Enter" | "=" => Some(Self::Equals),
            "Escape" => Some(Self::Clear),
            "Backspace" => Some(Self::Backspace),
            "+" => Some(Self::Operator(Operator::Add)),
            "-" => Some(Self::Operator(Operator::Subtract)),
            "*" => Some(Self::Operator(Operator::Multiply)),
            "/" => Some(Self::Operator(Operator::Divide)),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).map(|d| Self::Digit(d as u8)),
                    _ => None,
                }
            }
        }
    }
}

/// The calculator's single mutable record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    current_value: String,
    previous_value: Option<String>,
    operator: Option<Operator>,
    waiting_for_new_value: bool,
    history: History,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Creates the initial session state (`"0"`, nothing pending)
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_value: "0".to_string(),
            previous_value: None,
            operator: None,
            waiting_for_new_value: false,
            history: History::new(),
        }
    }

    /// The operand being typed or displayed
    #[must_use]
    pub fn current_value(&self) -> &str {
        &self.current_value
    }

    /// Left-hand operand of the pending operation
    #[must_use]
    pub fn previous_value(&self) -> Option<&str> {
        self.previous_value.as_deref()
    }

    /// Pending operator
    #[must_use]
    pub const fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// True right after an operator or equals; the next digit starts a new operand
    #[must_use]
    pub const fn waiting_for_new_value(&self) -> bool {
        self.waiting_for_new_value
    }

    /// Completed calculations, newest first
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Applies one input event
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Digit(d) => self.input_digit(d),
            Event::Decimal => self.input_decimal(),
            Event::Operator(op) => self.apply_operator(op),
            Event::Equals => self.equals(),
            Event::Clear => self.clear(),
            Event::ToggleSign => self.toggle_sign(),
            Event::Percent => self.percent(),
            Event::Backspace => self.backspace(),
        }
        debug_assert!(self.invariants_hold(), "state invariant broken: {self:?}");
    }

    /// Types a digit. Values above 9 are ignored.
    pub fn input_digit(&mut self, digit: u8) {
        let Some(ch) = char::from_digit(u32::from(digit), 10) else {
            return;
        };

        if self.waiting_for_new_value || self.current_value == ERROR {
            self.current_value = ch.to_string();
            self.waiting_for_new_value = false;
        } else if self.current_value == "0" {
            self.current_value = ch.to_string();
        } else {
            self.current_value.push(ch);
        }
    }

    /// Types the decimal point
    pub fn input_decimal(&mut self) {
        if self.waiting_for_new_value || self.current_value == ERROR {
            self.current_value = "0.".to_string();
            self.waiting_for_new_value = false;
        } else if !self.current_value.contains(['.', 'e']) {
            self.current_value.push('.');
        }
    }

    /// Presses a binary operator.
    ///
    /// A fully formed pending operation is evaluated first (chained
    /// evaluation). Pressing another operator before typing the next operand
    /// just replaces the pending one.
    pub fn apply_operator(&mut self, op: Operator) {
        match (self.previous_value.clone(), self.operator) {
            (Some(previous), Some(pending)) if !self.waiting_for_new_value => {
                let result = self.compute(&previous, pending);
                self.record(previous, pending, result.clone());
                self.previous_value = Some(result.clone());
                self.current_value = result;
            }
            (Some(_), _) => {}
            (None, _) => self.previous_value = Some(self.current_value.clone()),
        }
        self.operator = Some(op);
        self.waiting_for_new_value = true;
    }

    /// Evaluates the pending operation. No-op when nothing is pending.
    pub fn equals(&mut self) {
        let (Some(previous), Some(pending)) = (self.previous_value.take(), self.operator.take())
        else {
            return;
        };

        let result = self.compute(&previous, pending);
        self.record(previous, pending, result.clone());
        self.current_value = result;
        self.waiting_for_new_value = true;
    }

    /// Resets to the initial state; history is kept
    pub fn clear(&mut self) {
        self.current_value = "0".to_string();
        self.previous_value = None;
        self.operator = None;
        self.waiting_for_new_value = false;
    }

    /// Negates the current operand
    pub fn toggle_sign(&mut self) {
        self.current_value = format_number(-parse_number(&self.current_value));
    }

    /// Divides the current operand by 100
    pub fn percent(&mut self) {
        self.current_value = format_number(parse_number(&self.current_value) / 100.0);
    }

    /// Deletes the last character; a lone character becomes `"0"`.
    ///
    /// Dangling signs and exponent markers are trimmed with it, and
    /// `"Error"` is cleared outright.
    pub fn backspace(&mut self) {
        if self.current_value == ERROR || self.current_value.chars().count() <= 1 {
            self.current_value = "0".to_string();
            return;
        }

        self.current_value.pop();
        let trimmed_len = self.current_value.trim_end_matches(['e', '+', '-']).len();
        self.current_value.truncate(trimmed_len);
        if self.current_value.is_empty() {
            self.current_value = "0".to_string();
        }
    }

    /// Folds an AI answer into the state the way equals would.
    ///
    /// The history entry keeps the answer text verbatim; the display gets the
    /// first number found in it, or `"Error"`.
    pub fn inject_ai_result(&mut self, prompt: &str, result: &str) {
        let entry = self.history.record(prompt, result, true);
        debug!(id = %entry.id, prompt, result, "recorded AI result");

        self.current_value = normalize_operand(result);
        self.previous_value = None;
        self.operator = None;
        self.waiting_for_new_value = true;
    }

    /// Loads a past result into the current operand.
    ///
    /// The pending operation is left alone. Returns false for an unknown id.
    pub fn recall(&mut self, id: &str) -> bool {
        let Some(result) = self.history.select_result(id) else {
            return false;
        };
        self.current_value = normalize_operand(result);
        self.waiting_for_new_value = true;
        true
    }

    /// Empties the history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Checks the record-level invariants
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.operator.is_none() == self.previous_value.is_none()
            && is_valid_operand(&self.current_value)
    }

    fn compute(&self, previous: &str, op: Operator) -> String {
        let value = evaluate(
            parse_number(previous),
            parse_number(&self.current_value),
            Some(op),
        );
        format_result(value)
    }

    fn record(&mut self, previous: String, op: Operator, result: String) {
        let expression = format!("{previous} {op} {}", self.current_value);
        let entry = self.history.record(expression, result, false);
        debug!(id = %entry.id, expression = %entry.expression, result = %entry.result, "recorded calculation");
    }
}
