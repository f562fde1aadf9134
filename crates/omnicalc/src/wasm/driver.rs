//! DOM-backed driver
//!
//! Routes DOM events into a [`CalculatorApp`] and mirrors the app back into
//! the document after every event, the same way the browser front end does.
//! Runs the shared [`CalculatorDriver`] checks without a browser.

use tracing::debug;

use super::dom::{ids, DomElement, DomEvent, MockDom};
use super::keypad::{MockDomKeypadExt, WasmKeypad};
use crate::app::CalculatorApp;
use crate::core::Event;
use crate::driver::{CalculatorDriver, HistoryRow};
use crate::solver::SmartSolver;

/// Placeholder shown in an empty history list
pub const EMPTY_HISTORY_TEXT: &str = "No history yet";

/// Calculator app wired to a mock DOM
#[derive(Debug)]
pub struct WasmDriver {
    app: CalculatorApp,
    dom: MockDom,
    keypad: WasmKeypad,
}

impl Default for WasmDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmDriver {
    /// Fresh app on the calculator page with the keypad mounted
    #[must_use]
    pub fn new() -> Self {
        Self::with_app(CalculatorApp::new())
    }

    /// Wraps an existing app
    #[must_use]
    pub fn with_app(app: CalculatorApp) -> Self {
        let keypad = WasmKeypad::new();
        let mut dom = MockDom::calculator();
        dom.add_keypad(&keypad);
        let mut driver = Self { app, dom, keypad };
        driver.sync_dom();
        driver
    }

    /// The app
    #[must_use]
    pub const fn app(&self) -> &CalculatorApp {
        &self.app
    }

    /// The document
    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// The keypad
    #[must_use]
    pub const fn keypad(&self) -> &WasmKeypad {
        &self.keypad
    }

    /// Handles one DOM event and re-syncs the document.
    ///
    /// Returns true if the event changed anything in the app.
    pub fn handle_event(&mut self, event: DomEvent) -> bool {
        self.dom.dispatch_event(event.clone());
        let handled = match &event {
            DomEvent::Click { element_id } => self.route_click(element_id),
            DomEvent::KeyDown { key } => self.route_key(key),
            DomEvent::Input { .. } => false,
        };
        if handled {
            self.sync_dom();
        }
        handled
    }

    /// Clicks an element
    pub fn click(&mut self, element_id: &str) -> bool {
        self.handle_event(DomEvent::click(element_id))
    }

    /// Presses a keyboard key
    pub fn press_key(&mut self, key: &str) -> bool {
        self.handle_event(DomEvent::key_down(key))
    }

    /// Types into the solver prompt
    pub fn type_prompt(&mut self, text: &str) {
        self.handle_event(DomEvent::input(ids::SOLVER_INPUT, text));
    }

    /// Submits the solver prompt.
    ///
    /// The submit button is disabled while the request runs. On success the
    /// prompt is cleared; on failure it is kept for another try.
    pub async fn submit_solve(&mut self, solver: &SmartSolver) -> bool {
        self.dom.dispatch_event(DomEvent::click(ids::SOLVE_BUTTON));
        let prompt = self
            .dom
            .input_value(ids::SOLVER_INPUT)
            .unwrap_or_default()
            .to_string();

        self.dom.set_disabled(ids::SOLVE_BUTTON, true);
        let solved = self.app.solve(solver, &prompt).await;
        self.dom.set_disabled(ids::SOLVE_BUTTON, false);

        if solved {
            self.dom.set_input_value(ids::SOLVER_INPUT, "");
        }
        self.sync_dom();
        solved
    }

    fn route_click(&mut self, element_id: &str) -> bool {
        if let Some(event) = self.keypad.handle_click(element_id) {
            self.app.dispatch(event);
            return true;
        }
        match element_id {
            ids::HISTORY_BUTTON => self.app.toggle_history(),
            ids::CLEAR_HISTORY_BUTTON => self.app.clear_history(),
            ids::SOLVER_BUTTON => self.app.toggle_solver(),
            ids::DISMISS_EXPLANATION => self.app.dismiss_explanation(),
            other => {
                return other
                    .strip_prefix("history-")
                    .is_some_and(|id| self.app.select_history(id));
            }
        }
        true
    }

    fn route_key(&mut self, key: &str) -> bool {
        // The solver modal owns the keyboard while it is open
        if self.app.solver_open() {
            if key == "Escape" {
                self.app.close_solver();
                return true;
            }
            return false;
        }
        match Event::from_key(key) {
            Some(event) => {
                self.app.dispatch(event);
                true
            }
            None => {
                debug!(key, "ignored key");
                false
            }
        }
    }

    /// Mirrors the app into the document
    pub fn sync_dom(&mut self) {
        self.dom.set_element_text(ids::DISPLAY, &self.app.display());
        self.dom
            .set_element_text(ids::EXPRESSION, &self.app.expression());

        let explanation = self.app.explanation().map(str::to_string);
        self.dom
            .set_element_text(ids::EXPLANATION, explanation.as_deref().unwrap_or_default());
        self.dom.set_visible(ids::EXPLANATION, explanation.is_some());

        let error = self.app.solver_error().map(str::to_string);
        self.dom
            .set_element_text(ids::SOLVER_ERROR, error.as_deref().unwrap_or_default());
        self.dom.set_visible(ids::SOLVER_ERROR, error.is_some());

        self.dom
            .set_visible(ids::HISTORY_PANEL, self.app.history_open());
        self.dom.set_visible(ids::SOLVER_PANEL, self.app.solver_open());

        self.dom.clear_children(ids::HISTORY_LIST);
        let rows: Vec<DomElement> = self
            .app
            .history()
            .map(|item| {
                let mut row = DomElement::new("li")
                    .with_id(&ids::history_row(&item.id))
                    .with_text(&item.display())
                    .with_class("history-item")
                    .with_attr("data-expression", &item.expression)
                    .with_attr("data-result", &item.result);
                if item.is_ai_derived {
                    row = row.with_class("ai-derived");
                }
                row
            })
            .collect();
        if rows.is_empty() {
            self.dom.append_child(
                ids::HISTORY_LIST,
                DomElement::new("li")
                    .with_class("history-empty")
                    .with_text(EMPTY_HISTORY_TEXT),
            );
        }
        for row in rows {
            self.dom.append_child(ids::HISTORY_LIST, row);
        }
        self.dom
            .set_visible(ids::CLEAR_HISTORY_BUTTON, self.app.history().next().is_some());
    }

    /// Text of the main display element
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.dom.get_element_text(ids::DISPLAY).unwrap_or_default()
    }

    /// Text of the expression line element
    #[must_use]
    pub fn expression_text(&self) -> &str {
        self.dom
            .get_element_text(ids::EXPRESSION)
            .unwrap_or_default()
    }

    /// Rendered history rows, newest first
    #[must_use]
    pub fn history_list_items(&self) -> Vec<String> {
        self.dom
            .children(ids::HISTORY_LIST)
            .iter()
            .filter(|e| !e.id.is_empty())
            .map(|e| e.text_content.clone())
            .collect()
    }
}

impl CalculatorDriver for WasmDriver {
    fn press_key(&mut self, key: &str) -> bool {
        Self::press_key(self, key)
    }

    fn display(&self) -> String {
        self.display_text().to_string()
    }

    fn expression(&self) -> String {
        self.expression_text().to_string()
    }

    fn clear(&mut self) {
        self.click("btn-clear");
    }

    fn history(&self) -> Vec<HistoryRow> {
        self.dom
            .children(ids::HISTORY_LIST)
            .iter()
            .filter(|e| !e.id.is_empty())
            .map(|e| HistoryRow {
                expression: e.get_attr("data-expression").unwrap_or_default().to_string(),
                result: e.get_attr("data-result").unwrap_or_default().to_string(),
                ai: e.has_class("ai-derived"),
            })
            .collect()
    }

    fn select_history(&mut self, index: usize) -> bool {
        let row_id = self
            .dom
            .children(ids::HISTORY_LIST)
            .iter()
            .filter(|e| !e.id.is_empty())
            .nth(index)
            .map(|e| e.id.clone());
        row_id.is_some_and(|id| self.click(&id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::run_all_checks;
    use crate::solver::{AiResponse, SolveAdapter, SolveResult, SolverError};
    use async_trait::async_trait;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Answer(&'static str, &'static str);

    #[async_trait]
    impl SolveAdapter for Answer {
        async fn solve(&self, _input: &str) -> SolveResult<AiResponse> {
            Ok(AiResponse {
                result: self.0.to_string(),
                explanation: self.1.to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct Offline;

    #[async_trait]
    impl SolveAdapter for Offline {
        async fn solve(&self, _input: &str) -> SolveResult<AiResponse> {
            Err(SolverError::EmptyResponse)
        }
    }

    fn click_all(driver: &mut WasmDriver, ids: &[&str]) {
        for id in ids {
            assert!(driver.click(id), "click on {id} not handled");
        }
    }

    // ===== Construction tests =====

    #[test]
    fn test_new_driver_renders() {
        let driver = WasmDriver::new();
        assert_eq!(driver.display_text(), "0");
        assert_eq!(driver.expression_text(), "");
        assert!(driver.history_list_items().is_empty());
        assert_eq!(
            driver.dom().children(ids::HISTORY_LIST)[0].text_content,
            EMPTY_HISTORY_TEXT
        );
        assert!(!driver.dom().is_visible(ids::CLEAR_HISTORY_BUTTON));
        assert_eq!(driver.keypad().button_count(), 19);
    }

    // ===== Keypad click tests =====

    #[test]
    fn test_click_keypad() {
        let mut driver = WasmDriver::new();
        click_all(&mut driver, &["btn-1", "btn-2", "btn-0", "btn-0", "btn-times"]);
        assert_eq!(driver.display_text(), "1,200");
        assert_eq!(driver.expression_text(), "1,200 ×");

        click_all(&mut driver, &["btn-3", "btn-equals"]);
        assert_eq!(driver.display_text(), "3,600");
        assert_eq!(driver.history_list_items(), vec!["1200 × 3 = 3600"]);
        assert!(driver.dom().is_visible(ids::CLEAR_HISTORY_BUTTON));
    }

    #[test]
    fn test_click_sign_and_percent() {
        let mut driver = WasmDriver::new();
        click_all(&mut driver, &["btn-5", "btn-0", "btn-sign"]);
        assert_eq!(driver.display_text(), "-50");
        driver.click("btn-percent");
        assert_eq!(driver.display_text(), "-0.5");
    }

    #[test]
    fn test_click_unknown_element() {
        let mut driver = WasmDriver::new();
        assert!(!driver.click("calc-display"));
        assert!(!driver.click("history-missing"));
    }

    // ===== Keyboard tests =====

    #[test]
    fn test_keyboard_input() {
        let mut driver = WasmDriver::new();
        for key in ["9", "/", "2", "Enter"] {
            assert!(driver.press_key(key));
        }
        assert_eq!(driver.display_text(), "4.5");
        assert!(!driver.press_key("Shift"));
        assert!(driver.press_key("Backspace"));
        assert_eq!(driver.display_text(), "4.");
    }

    #[test]
    fn test_keyboard_ignored_while_solver_open() {
        let mut driver = WasmDriver::new();
        driver.click(ids::SOLVER_BUTTON);
        assert!(driver.dom().is_visible(ids::SOLVER_PANEL));
        assert!(!driver.press_key("7"));
        assert_eq!(driver.display_text(), "0");

        assert!(driver.press_key("Escape"));
        assert!(!driver.dom().is_visible(ids::SOLVER_PANEL));
        assert!(driver.press_key("7"));
        assert_eq!(driver.display_text(), "7");
    }

    // ===== Panel tests =====

    #[test]
    fn test_history_panel_and_recall() {
        let mut driver = WasmDriver::new();
        for key in ["7", "*", "6", "=", "Escape", "1", "+"] {
            driver.press_key(key);
        }
        driver.click(ids::HISTORY_BUTTON);
        assert!(driver.dom().is_visible(ids::HISTORY_PANEL));

        let id = driver.app().history().next().unwrap().id.clone();
        assert!(driver.click(&ids::history_row(&id)));
        assert_eq!(driver.display_text(), "42");
        assert_eq!(driver.expression_text(), "1 +");
        assert!(!driver.dom().is_visible(ids::HISTORY_PANEL));
    }

    #[test]
    fn test_clear_history_button() {
        let mut driver = WasmDriver::new();
        for key in ["1", "+", "1", "="] {
            driver.press_key(key);
        }
        assert_eq!(driver.history_list_items().len(), 1);
        driver.click(ids::CLEAR_HISTORY_BUTTON);
        assert!(driver.history_list_items().is_empty());
        assert_eq!(driver.display_text(), "2");
    }

    // ===== Solver tests =====

    #[tokio::test]
    async fn test_submit_solve_success() {
        let solver = SmartSolver::new(Arc::new(Answer("17.1", "0.2 × 85.5 = 17.1")));
        let mut driver = WasmDriver::new();
        driver.click(ids::SOLVER_BUTTON);
        driver.type_prompt("What is 20% of 85.5?");

        assert!(driver.submit_solve(&solver).await);
        assert_eq!(driver.display_text(), "17.1");
        assert!(driver.dom().is_visible(ids::EXPLANATION));
        assert_eq!(
            driver.dom().get_element_text(ids::EXPLANATION),
            Some("0.2 × 85.5 = 17.1")
        );
        assert!(!driver.dom().is_visible(ids::SOLVER_PANEL));
        assert_eq!(driver.dom().input_value(ids::SOLVER_INPUT), Some(""));
        assert!(!driver.dom().is_disabled(ids::SOLVE_BUTTON));

        let rows = CalculatorDriver::history(&driver);
        assert!(rows[0].ai);
        assert_eq!(rows[0].expression, "What is 20% of 85.5?");

        driver.click(ids::DISMISS_EXPLANATION);
        assert!(!driver.dom().is_visible(ids::EXPLANATION));
    }

    #[tokio::test]
    async fn test_submit_solve_failure_keeps_prompt() {
        let solver = SmartSolver::new(Arc::new(Offline));
        let mut driver = WasmDriver::new();
        driver.press_key("8");
        driver.click(ids::SOLVER_BUTTON);
        driver.type_prompt("integrate x");

        assert!(!driver.submit_solve(&solver).await);
        assert_eq!(driver.display_text(), "8");
        assert!(driver.dom().is_visible(ids::SOLVER_ERROR));
        assert_eq!(
            driver.dom().get_element_text(ids::SOLVER_ERROR),
            Some("Failed to solve. Please try again.")
        );
        assert!(driver.dom().is_visible(ids::SOLVER_PANEL));
        assert_eq!(driver.dom().input_value(ids::SOLVER_INPUT), Some("integrate x"));
    }

    // ===== Shared driver check tests =====

    #[test]
    fn test_wasm_all_checks() {
        run_all_checks(&mut WasmDriver::new());
    }

    #[test]
    fn test_wasm_driver_history_rows() {
        let mut driver = WasmDriver::new();
        driver.press_keys(&["2", "-", "5", "="]);
        let rows = CalculatorDriver::history(&driver);
        assert_eq!(
            rows,
            vec![HistoryRow {
                expression: "2 - 5".into(),
                result: "-3".into(),
                ai: false
            }]
        );
        assert!(!CalculatorDriver::select_history(&mut driver, 3));
    }
}
