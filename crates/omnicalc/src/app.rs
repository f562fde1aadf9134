//! Calculator application state
//!
//! Owns the reducer state plus the view flags around it: the explanation
//! toast, the solver error line and which side panels are open.

use tracing::debug;

use crate::core::{CalculatorState, Event, HistoryItem};
use crate::display;
use crate::solver::{SmartSolver, SolveOutcome};

/// Calculator plus the surrounding view state
#[derive(Debug, Clone, Default)]
pub struct CalculatorApp {
    state: CalculatorState,
    explanation: Option<String>,
    solver_error: Option<String>,
    history_open: bool,
    solver_open: bool,
}

impl CalculatorApp {
    /// Creates a fresh app
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The reducer state
    #[must_use]
    pub const fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Grouped main display text
    #[must_use]
    pub fn display(&self) -> String {
        display::value_line(&self.state)
    }

    /// Grouped pending-operation line
    #[must_use]
    pub fn expression(&self) -> String {
        display::expression_line(&self.state)
    }

    /// Explanation of the last AI answer, until dismissed
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Message from the last failed solve
    #[must_use]
    pub fn solver_error(&self) -> Option<&str> {
        self.solver_error.as_deref()
    }

    /// History entries, newest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryItem> {
        self.state.history().iter()
    }

    /// Applies a keypad or keyboard event
    pub fn dispatch(&mut self, event: Event) {
        if matches!(event, Event::Equals | Event::Clear) {
            self.explanation = None;
        }
        self.state.dispatch(event);
    }

    /// Maps a key name and dispatches it; returns false for ignored keys
    pub fn press_key(&mut self, key: &str) -> bool {
        match Event::from_key(key) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Folds a solver outcome into the app; returns true if the state changed
    pub fn apply_solve(&mut self, outcome: SolveOutcome) -> bool {
        match outcome {
            SolveOutcome::Solved { prompt, response } => {
                self.state.inject_ai_result(&prompt, &response.result);
                self.explanation = Some(response.explanation);
                self.solver_error = None;
                self.solver_open = false;
                true
            }
            SolveOutcome::Failed(err) => {
                debug!(error = %err, "solve failed; state unchanged");
                self.solver_error = Some(err.user_message().to_string());
                false
            }
            SolveOutcome::Rejected(reason) => {
                debug!(?reason, "solve rejected");
                false
            }
        }
    }

    /// Submits `prompt` through `solver` and applies the outcome
    pub async fn solve(&mut self, solver: &SmartSolver, prompt: &str) -> bool {
        let outcome = solver.submit(prompt).await;
        self.apply_solve(outcome)
    }

    /// Hides the explanation toast
    pub fn dismiss_explanation(&mut self) {
        self.explanation = None;
    }

    /// Loads a history result and closes the history panel.
    ///
    /// Unknown ids are ignored and leave the panel open.
    pub fn select_history(&mut self, id: &str) -> bool {
        let found = self.state.recall(id);
        if found {
            self.history_open = false;
        }
        found
    }

    /// Empties the history
    pub fn clear_history(&mut self) {
        self.state.clear_history();
    }

    /// Whether the history panel is shown
    #[must_use]
    pub const fn history_open(&self) -> bool {
        self.history_open
    }

    /// Opens the history panel
    pub fn open_history(&mut self) {
        self.history_open = true;
    }

    /// Closes the history panel
    pub fn close_history(&mut self) {
        self.history_open = false;
    }

    /// Toggles the history panel
    pub fn toggle_history(&mut self) {
        self.history_open = !self.history_open;
    }

    /// Whether the solver panel is shown
    #[must_use]
    pub const fn solver_open(&self) -> bool {
        self.solver_open
    }

    /// Opens the solver panel and clears any stale error
    pub fn open_solver(&mut self) {
        self.solver_open = true;
        self.solver_error = None;
    }

    /// Closes the solver panel
    pub fn close_solver(&mut self) {
        self.solver_open = false;
    }

    /// Toggles the solver panel
    pub fn toggle_solver(&mut self) {
        if self.solver_open {
            self.close_solver();
        } else {
            self.open_solver();
        }
    }
}
