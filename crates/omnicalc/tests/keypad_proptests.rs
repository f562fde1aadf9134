//! Property-based tests for the keypad and DOM driver

use omnicalc::core::{Event, Operator};
use omnicalc::driver::CalculatorDriver;
use omnicalc::wasm::{WasmDriver, WasmKeypad};
use omnicalc::CalculatorApp;
use proptest::prelude::*;

// ===== Strategy definitions =====

fn grid_position_strategy() -> impl Strategy<Value = (usize, usize)> {
    (0usize..5usize, 0usize..4usize)
}

/// Keys the keyboard handler understands
fn mapped_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u8..=9u8).prop_map(|d| d.to_string()),
        Just(".".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("=".to_string()),
        Just("Enter".to_string()),
        Just("Escape".to_string()),
        Just("Backspace".to_string()),
    ]
}

// ===== Property tests for WasmKeypad =====

proptest! {
    /// Every grid cell is covered by exactly one button
    #[test]
    fn prop_grid_cell_has_button((row, col) in grid_position_strategy()) {
        let keypad = WasmKeypad::new();
        prop_assert!(keypad.get_button_at(row, col).is_some());
    }

    /// Cells outside the grid have no button
    #[test]
    fn prop_outside_grid_empty(row in 5usize..20, col in 4usize..20) {
        let keypad = WasmKeypad::new();
        prop_assert!(keypad.get_button_at(row, col).is_none());
        prop_assert!(keypad.get_button_at(0, col).is_none());
    }

    /// Clicking a button sends the same event as its definition
    #[test]
    fn prop_click_matches_definition(index in 0usize..19) {
        let keypad = WasmKeypad::new();
        let button = &keypad.buttons()[index];
        prop_assert_eq!(keypad.handle_click(&button.id), Some(button.event));
    }

    /// Digit keys map to digit events
    #[test]
    fn prop_digit_keys(d in 0u8..=9u8) {
        prop_assert_eq!(WasmKeypad::key_to_event(&d.to_string()), Some(Event::Digit(d)));
    }

    /// Single letters are never mapped
    #[test]
    fn prop_letters_ignored(c in "[a-zA-Z]") {
        prop_assert_eq!(WasmKeypad::key_to_event(&c), None);
    }

    /// Clicking the digit button and typing the digit do the same thing
    #[test]
    fn prop_click_and_key_agree(digits in prop::collection::vec(0u8..=9u8, 1..8)) {
        let mut by_click = WasmDriver::new();
        let mut by_key = WasmDriver::new();
        for d in &digits {
            by_click.click(&format!("btn-{d}"));
            by_key.press_key(&d.to_string());
        }
        prop_assert_eq!(by_click.display_text(), by_key.display_text());
    }

    /// The DOM driver renders exactly what the app computes
    #[test]
    fn prop_dom_mirrors_app(keys in prop::collection::vec(mapped_key_strategy(), 0..40)) {
        let mut app = CalculatorApp::new();
        let mut web = WasmDriver::new();
        for key in &keys {
            app.press_key(key);
            web.press_key(key);
        }
        prop_assert_eq!(app.display(), web.display_text());
        prop_assert_eq!(app.expression(), web.expression_text());
        prop_assert_eq!(
            CalculatorDriver::history(&app),
            CalculatorDriver::history(&web)
        );
    }
}

#[test]
fn test_operator_buttons_present() {
    let keypad = WasmKeypad::new();
    for op in [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ] {
        let button = keypad.find_button_by_event(Event::Operator(op)).unwrap();
        assert_eq!(button.label, op.symbol());
        assert_eq!(button.col, 3);
    }
}
