//! Binary operators understood by the keypad
//!
//! Each operator is a closed enum variant, so an unknown operator can never
//! reach the evaluator.

use std::fmt;

/// Type-safe operator enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
    /// Remainder (%)
    ///
    /// This is the mathematical remainder `a mod b`, not "percent of".
    Modulo,
}

impl Operator {
    /// All operators in keypad order
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
    ];

    /// Returns the operator symbol shown on the display
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "%",
        }
    }

    /// Parses a display or keyboard symbol.
    ///
    /// Accepts the ASCII keyboard spellings `*` and `/` as well as the
    /// display glyphs `×` and `÷`.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' | '*' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            '%' => Some(Self::Modulo),
            _ => None,
        }
    }

    /// Applies the operator to two operands.
    ///
    /// Division by zero yields NaN instead of infinity. Modulo follows IEEE
    /// `fmod`, so `x % 0` is NaN as well.
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    f64::NAN
                } else {
                    a / b
                }
            }
            Self::Modulo => a % b,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
