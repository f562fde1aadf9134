//! Browser front end
//!
//! The mock DOM, keypad and driver build everywhere so the page logic is
//! tested natively; the `wasm-bindgen` entry point needs the `wasm` feature.

#[cfg(feature = "wasm")]
mod browser;
mod dom;
mod driver;
mod keypad;

#[cfg(feature = "wasm")]
pub use browser::BrowserCalculator;
pub use dom::{ids, DomElement, DomEvent, MockDom};
pub use driver::{WasmDriver, EMPTY_HISTORY_TEXT};
pub use keypad::{ButtonVariant, KeypadButtonDef, MockDomKeypadExt, WasmKeypad};
