//! Browser bindings
//!
//! The page owns one [`BrowserCalculator`]; JavaScript forwards clicks and
//! keydowns to it and re-renders from its getters.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::console;

use crate::app::CalculatorApp;
use crate::config::SolverConfig;
use crate::solver::{GeminiSolver, SmartSolver};
use crate::wasm::keypad::WasmKeypad;

/// Calculator exposed to JavaScript
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    app: Rc<RefCell<CalculatorApp>>,
    keypad: WasmKeypad,
    solver: Option<SmartSolver>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Create a calculator; the solver stays off until configured
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            app: Rc::new(RefCell::new(CalculatorApp::new())),
            keypad: WasmKeypad::new(),
            solver: None,
        }
    }

    /// Main display text
    #[wasm_bindgen(getter)]
    pub fn display(&self) -> String {
        self.app.borrow().display()
    }

    /// Pending-operation line
    #[wasm_bindgen(getter)]
    pub fn expression(&self) -> String {
        self.app.borrow().expression()
    }

    /// Explanation of the last AI answer
    #[wasm_bindgen(getter)]
    pub fn explanation(&self) -> Option<String> {
        self.app.borrow().explanation().map(str::to_string)
    }

    /// Last solver error message
    #[wasm_bindgen(getter = solverError)]
    pub fn solver_error(&self) -> Option<String> {
        self.app.borrow().solver_error().map(str::to_string)
    }

    /// Whether the history panel is open
    #[wasm_bindgen(getter = historyOpen)]
    pub fn history_open(&self) -> bool {
        self.app.borrow().history_open()
    }

    /// Whether the solver modal is open
    #[wasm_bindgen(getter = solverOpen)]
    pub fn solver_open(&self) -> bool {
        self.app.borrow().solver_open()
    }

    /// True while a solve request is in flight
    #[wasm_bindgen(getter)]
    pub fn solving(&self) -> bool {
        self.solver.as_ref().is_some_and(SmartSolver::is_busy)
    }

    /// True once an API key has been configured
    #[wasm_bindgen(getter = solverReady)]
    pub fn solver_ready(&self) -> bool {
        self.solver.is_some()
    }

    /// Handle a keypad click by element id
    #[wasm_bindgen(js_name = handleButton)]
    pub fn handle_button(&mut self, button_id: &str) -> bool {
        match self.keypad.handle_click(button_id) {
            Some(event) => {
                self.app.borrow_mut().dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Handle a window keydown; ignored while the solver modal is open
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        let mut app = self.app.borrow_mut();
        if app.solver_open() {
            if key == "Escape" {
                app.close_solver();
                return true;
            }
            return false;
        }
        app.press_key(key)
    }

    /// Toggle the history panel
    #[wasm_bindgen(js_name = toggleHistory)]
    pub fn toggle_history(&mut self) {
        self.app.borrow_mut().toggle_history();
    }

    /// Toggle the solver modal
    #[wasm_bindgen(js_name = toggleSolver)]
    pub fn toggle_solver(&mut self) {
        self.app.borrow_mut().toggle_solver();
    }

    /// Hide the explanation toast
    #[wasm_bindgen(js_name = dismissExplanation)]
    pub fn dismiss_explanation(&mut self) {
        self.app.borrow_mut().dismiss_explanation();
    }

    /// Recall a history entry by id
    #[wasm_bindgen(js_name = selectHistory)]
    pub fn select_history(&mut self, id: &str) -> bool {
        self.app.borrow_mut().select_history(id)
    }

    /// Empty the history
    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) {
        self.app.borrow_mut().clear_history();
    }

    /// History as a JSON array, newest first
    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&self) -> String {
        self.app
            .borrow()
            .state()
            .history()
            .to_json()
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Number of history entries
    #[wasm_bindgen(js_name = historyCount)]
    pub fn history_count(&self) -> usize {
        self.app.borrow().state().history().len()
    }

    /// Enable the AI solver with a Gemini API key and optional model
    #[wasm_bindgen(js_name = configureSolver)]
    pub fn configure_solver(&mut self, api_key: String, model: Option<String>) -> Result<(), JsError> {
        let mut config = SolverConfig::default().with_api_key(api_key);
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model);
        }
        let adapter = GeminiSolver::from_config(&config).map_err(|e| JsError::new(&e.to_string()))?;
        self.solver = Some(SmartSolver::new(Arc::new(adapter)));
        Ok(())
    }

    /// Solve a natural-language prompt.
    ///
    /// Resolves to `true` when the answer was applied. Failures resolve to
    /// `false` and leave the message in `solverError`.
    pub fn solve(&self, prompt: String) -> Promise {
        let app = Rc::clone(&self.app);
        let solver = self.solver.clone();
        future_to_promise(async move {
            let Some(solver) = solver else {
                console::warn_1(&"solver not configured".into());
                return Ok(JsValue::FALSE);
            };
            let outcome = solver.submit(&prompt).await;
            let applied = app.borrow_mut().apply_solve(outcome);
            Ok(JsValue::from_bool(applied))
        })
    }
}

impl Default for BrowserCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Module start hook
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"OmniCalc WASM initialized".into());
}
