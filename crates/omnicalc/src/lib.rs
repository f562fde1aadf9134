//! OmniCalc - a four-function calculator with an AI solver
//!
//! The core is a small input state machine: keys go in, a display string
//! comes out, and every completed operation lands in a newest-first history.
//! A natural-language prompt can be handed to an AI adapter instead; its
//! answer is folded into the same state.
//!
//! # Example
//!
//! ```rust
//! use omnicalc::prelude::*;
//!
//! let mut app = CalculatorApp::new();
//! for key in ["1", "2", "0", "0", "*", "3", "Enter"] {
//!     app.press_key(key);
//! }
//! assert_eq!(app.display(), "3,600");
//!
//! let entry = app.history().next().unwrap();
//! assert_eq!(entry.display(), "1200 × 3 = 3600");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod app;
pub mod config;
pub mod core;
pub mod display;
pub mod driver;
pub mod solver;

/// Browser front end - always built for testing
/// (the mock DOM runs without browser bindings)
pub mod wasm;

pub use app::CalculatorApp;
pub use config::SolverConfig;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::app::CalculatorApp;
    pub use crate::config::SolverConfig;
    pub use crate::core::{
        evaluate, format_result, parse_number, CalculatorState, Event, History, HistoryItem,
        Operator, ERROR,
    };
    pub use crate::display::group_thousands;
    pub use crate::driver::{CalculatorDriver, HistoryRow};
    pub use crate::solver::{
        AiResponse, GeminiSolver, Rejection, SmartSolver, SolveAdapter, SolveOutcome,
        SolveResult, SolverError,
    };
    pub use crate::wasm::{DomElement, DomEvent, MockDom, WasmDriver, WasmKeypad};
}
