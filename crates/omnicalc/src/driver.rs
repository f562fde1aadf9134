//! Unified calculator driver
//!
//! Write the interaction checks once and run them against every front end:
//! the plain [`CalculatorApp`], the DOM-backed `WasmDriver`, or anything else
//! that can press keys and read the display.

use crate::app::CalculatorApp;

/// Abstract driver for calculator interactions
///
/// # Example
///
/// ```rust
/// use omnicalc::driver::{verify_basic_arithmetic, CalculatorDriver};
/// use omnicalc::CalculatorApp;
///
/// let mut app = CalculatorApp::new();
/// verify_basic_arithmetic(&mut app);
/// ```
pub trait CalculatorDriver {
    /// Presses a key by keyboard name (`"7"`, `"+"`, `"Enter"`, ...).
    /// Returns false when the key is not mapped.
    fn press_key(&mut self, key: &str) -> bool;

    /// Presses several keys in order
    fn press_keys(&mut self, keys: &[&str]) {
        for key in keys {
            self.press_key(key);
        }
    }

    /// Current display text, grouped
    fn display(&self) -> String;

    /// Pending-operation line
    fn expression(&self) -> String;

    /// All-clear
    fn clear(&mut self);

    /// History entries, newest first
    fn history(&self) -> Vec<HistoryRow>;

    /// Recalls the history entry at `index` (0 = newest)
    fn select_history(&mut self, index: usize) -> bool;
}

/// A history entry as seen through a driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// The expression that was evaluated
    pub expression: String,
    /// The result as a string
    pub result: String,
    /// True for AI-derived entries
    pub ai: bool,
}

impl CalculatorDriver for CalculatorApp {
    fn press_key(&mut self, key: &str) -> bool {
        Self::press_key(self, key)
    }

    fn display(&self) -> String {
        Self::display(self)
    }

    fn expression(&self) -> String {
        Self::expression(self)
    }

    fn clear(&mut self) {
        self.dispatch(crate::core::Event::Clear);
    }

    fn history(&self) -> Vec<HistoryRow> {
        Self::history(self)
            .map(|item| HistoryRow {
                expression: item.expression.clone(),
                result: item.result.clone(),
                ai: item.is_ai_derived,
            })
            .collect()
    }

    fn select_history(&mut self, index: usize) -> bool {
        let id = self.state().history().get(index).map(|item| item.id.clone());
        match id {
            Some(id) => Self::select_history(self, &id),
            None => false,
        }
    }
}

// ===== Shared driver checks =====
// These run against ANY CalculatorDriver implementation

/// Verifies the four basic operations
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&["2", "+", "3", "="]);
    assert_eq!(driver.display(), "5");
    driver.clear();

    driver.press_keys(&["1", "0", "-", "4", "="]);
    assert_eq!(driver.display(), "6");
    driver.clear();

    driver.press_keys(&["6", "*", "7", "="]);
    assert_eq!(driver.display(), "42");
    driver.clear();

    driver.press_keys(&["2", "0", "/", "4", "="]);
    assert_eq!(driver.display(), "5");
    driver.clear();
}

/// Verifies left-to-right chaining with the expression line
pub fn verify_chained_operations<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&["5", "+", "3", "+"]);
    assert_eq!(driver.display(), "8");
    assert_eq!(driver.expression(), "8 +");

    driver.press_keys(&["2", "*"]);
    assert_eq!(driver.display(), "10");
    assert_eq!(driver.expression(), "10 ×");

    driver.press_keys(&["4", "Enter"]);
    assert_eq!(driver.display(), "40");
    assert_eq!(driver.expression(), "");
    driver.clear();
}

/// Verifies binary float artifacts are rounded away
pub fn verify_float_rounding<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&[".", "1", "+", ".", "2", "="]);
    assert_eq!(driver.display(), "0.3");
    driver.clear();

    driver.press_keys(&["1", "/", "3", "="]);
    assert_eq!(driver.display(), "0.333333333333");
    driver.clear();
}

/// Verifies division by zero shows Error and input recovers
pub fn verify_error_recovery<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&["7", "/", "0", "="]);
    assert_eq!(driver.display(), "Error");

    driver.press_keys(&["4", "+", "1", "="]);
    assert_eq!(driver.display(), "5");
    driver.clear();
}

/// Verifies history ordering and contents
pub fn verify_history<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&["1", "+", "1", "="]);
    driver.press_keys(&["2", "+", "2", "="]);
    driver.press_keys(&["3", "+", "3", "="]);

    let history = driver.history();
    assert!(history.len() >= 3);
    assert_eq!(history[0].expression, "3 + 3");
    assert_eq!(history[0].result, "6");
    assert_eq!(history[2].expression, "1 + 1");
    assert!(!history[0].ai);
    driver.clear();
}

/// Verifies backspace editing
pub fn verify_backspace<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&["1", "2", "3", "Backspace"]);
    assert_eq!(driver.display(), "12");
    driver.press_keys(&["Backspace", "Backspace"]);
    assert_eq!(driver.display(), "0");
    driver.clear();
}

/// Verifies that recalling history loads the result as the current operand
pub fn verify_history_recall<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();

    driver.press_keys(&["1", "2", "*", "1", "0", "="]);
    driver.clear();
    driver.press_keys(&["5", "+"]);
    assert!(driver.select_history(0));
    assert_eq!(driver.display(), "120");
    assert_eq!(driver.expression(), "5 +");

    driver.press_key("=");
    assert_eq!(driver.display(), "125");
    driver.clear();
}

/// Complete verification suite
pub fn run_all_checks<D: CalculatorDriver>(driver: &mut D) {
    verify_basic_arithmetic(driver);
    verify_chained_operations(driver);
    verify_float_rounding(driver);
    verify_error_recovery(driver);
    verify_history(driver);
    verify_backspace(driver);
    verify_history_recall(driver);
}
