//! On-screen keypad
//!
//! Layout:
//! ```text
//! [ AC ] [ ± ] [ % ] [ ÷ ]
//! [ 7  ] [ 8 ] [ 9 ] [ × ]
//! [ 4  ] [ 5 ] [ 6 ] [ - ]
//! [ 1  ] [ 2 ] [ 3 ] [ + ]
//! [    0     ] [ . ] [ = ]
//! ```

use super::dom::{ids, DomElement, MockDom};
use crate::core::{Event, Operator};

/// Visual style of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Digits and the decimal point
    Default,
    /// Operators and equals
    Accent,
    /// Clear, sign and percent
    Secondary,
}

impl ButtonVariant {
    /// CSS class for the variant
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Default => "btn-default",
            Self::Accent => "btn-accent",
            Self::Secondary => "btn-secondary",
        }
    }
}

/// A single keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// Event sent on click
    pub event: Event,
    /// DOM element id
    pub id: String,
    /// Face label
    pub label: &'static str,
    /// Grid row
    pub row: usize,
    /// First grid column
    pub col: usize,
    /// Columns covered
    pub span: usize,
    /// Style
    pub variant: ButtonVariant,
}

impl KeypadButtonDef {
    /// Creates a single-width button; id, label and style follow from `event`
    #[must_use]
    pub fn new(event: Event, row: usize, col: usize) -> Self {
        let (id, label, variant) = describe(event);
        Self {
            event,
            id,
            label,
            row,
            col,
            span: 1,
            variant,
        }
    }

    /// Widens the button
    #[must_use]
    pub const fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// True if the button covers grid cell (`row`, `col`)
    #[must_use]
    pub const fn covers(&self, row: usize, col: usize) -> bool {
        self.row == row && col >= self.col && col < self.col + self.span
    }
}

fn describe(event: Event) -> (String, &'static str, ButtonVariant) {
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    match event {
        Event::Digit(d) => (
            format!("btn-{d}"),
            DIGITS.get(usize::from(d)).copied().unwrap_or("?"),
            ButtonVariant::Default,
        ),
        Event::Decimal => ("btn-decimal".into(), ".", ButtonVariant::Default),
        Event::Operator(op) => (
            format!("btn-{}", operator_name(op)),
            op.symbol(),
            ButtonVariant::Accent,
        ),
        Event::Equals => ("btn-equals".into(), "=", ButtonVariant::Accent),
        Event::Clear => ("btn-clear".into(), "AC", ButtonVariant::Secondary),
        Event::ToggleSign => ("btn-sign".into(), "±", ButtonVariant::Secondary),
        Event::Percent => ("btn-percent".into(), "%", ButtonVariant::Secondary),
        Event::Backspace => ("btn-backspace".into(), "⌫", ButtonVariant::Secondary),
    }
}

const fn operator_name(op: Operator) -> &'static str {
    match op {
        Operator::Add => "plus",
        Operator::Subtract => "minus",
        Operator::Multiply => "times",
        Operator::Divide => "divide",
        Operator::Modulo => "mod",
    }
}

/// The keypad grid
#[derive(Debug, Clone)]
pub struct WasmKeypad {
    buttons: Vec<KeypadButtonDef>,
    rows: usize,
    cols: usize,
}

impl Default for WasmKeypad {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmKeypad {
    /// Standard 5×4 layout
    #[must_use]
    pub fn new() -> Self {
        use Event::{Clear, Decimal, Digit, Equals, Percent, ToggleSign};
        let op = Event::Operator;

        let grid: [[Option<Event>; 4]; 4] = [
            [Some(Clear), Some(ToggleSign), Some(Percent), Some(op(Operator::Divide))],
            [Some(Digit(7)), Some(Digit(8)), Some(Digit(9)), Some(op(Operator::Multiply))],
            [Some(Digit(4)), Some(Digit(5)), Some(Digit(6)), Some(op(Operator::Subtract))],
            [Some(Digit(1)), Some(Digit(2)), Some(Digit(3)), Some(op(Operator::Add))],
        ];

        let mut buttons: Vec<KeypadButtonDef> = grid
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter_map(move |(col, cell)| cell.map(|e| KeypadButtonDef::new(e, row, col)))
            })
            .collect();

        buttons.push(KeypadButtonDef::new(Digit(0), 4, 0).with_span(2));
        buttons.push(KeypadButtonDef::new(Decimal, 4, 2));
        buttons.push(KeypadButtonDef::new(Equals, 4, 3));

        Self {
            buttons,
            rows: 5,
            cols: 4,
        }
    }

    /// Number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Grid size (rows, cols)
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All buttons in layout order
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Button covering a grid cell
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.covers(row, col))
    }

    /// Button by element id
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Button that sends `event`
    #[must_use]
    pub fn find_button_by_event(&self, event: Event) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.event == event)
    }

    /// Event for a clicked element id
    #[must_use]
    pub fn handle_click(&self, element_id: &str) -> Option<Event> {
        self.find_button_by_id(element_id).map(|b| b.event)
    }

    /// Event for a keyboard key name
    #[must_use]
    pub fn key_to_event(key: &str) -> Option<Event> {
        Event::from_key(key)
    }

    /// Button elements
    #[must_use]
    pub fn create_dom_elements(&self) -> Vec<DomElement> {
        self.buttons
            .iter()
            .map(|btn| {
                let mut elem = DomElement::new("button")
                    .with_id(&btn.id)
                    .with_text(btn.label)
                    .with_class("keypad-btn")
                    .with_class(btn.variant.class())
                    .with_attr("data-row", &btn.row.to_string())
                    .with_attr("data-col", &btn.col.to_string());
                if btn.span > 1 {
                    elem = elem.with_class(&format!("col-span-{}", btn.span));
                }
                elem
            })
            .collect()
    }

    /// Keypad container holding every button
    #[must_use]
    pub fn create_keypad_element(&self) -> DomElement {
        self.create_dom_elements().into_iter().fold(
            DomElement::new("div").with_id(ids::KEYPAD).with_class("keypad"),
            DomElement::with_child,
        )
    }
}

/// Mounts a keypad into a [`MockDom`]
pub trait MockDomKeypadExt {
    /// Adds the keypad buttons under the keypad container
    fn add_keypad(&mut self, keypad: &WasmKeypad);
}

impl MockDomKeypadExt for MockDom {
    fn add_keypad(&mut self, keypad: &WasmKeypad) {
        if self.get_element(ids::KEYPAD).is_none() {
            self.register_element(DomElement::new("div").with_id(ids::KEYPAD));
        }
        for button in keypad.create_dom_elements() {
            self.append_child(ids::KEYPAD, button);
        }
    }
}
