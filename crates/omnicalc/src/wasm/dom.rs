//! Mock DOM
//!
//! Enough of a document model to drive and inspect the browser front end in
//! plain `cargo test`, without a browser or `web-sys`.

use std::collections::HashMap;

/// Element ids shared by the mock DOM and the real page
pub mod ids {
    /// Root container
    pub const ROOT: &str = "calculator";
    /// Pending-operation line
    pub const EXPRESSION: &str = "calc-expression";
    /// Main value display
    pub const DISPLAY: &str = "calc-display";
    /// Keypad grid container
    pub const KEYPAD: &str = "calc-keypad";
    /// Explanation toast for AI answers
    pub const EXPLANATION: &str = "calc-explanation";
    /// Button closing the explanation toast
    pub const DISMISS_EXPLANATION: &str = "btn-dismiss-explanation";
    /// History side panel
    pub const HISTORY_PANEL: &str = "history-panel";
    /// History entry list
    pub const HISTORY_LIST: &str = "calc-history";
    /// Header button toggling the history panel
    pub const HISTORY_BUTTON: &str = "btn-history";
    /// Button clearing the history
    pub const CLEAR_HISTORY_BUTTON: &str = "btn-clear-history";
    /// Solver modal
    pub const SOLVER_PANEL: &str = "solver-panel";
    /// Header button toggling the solver modal
    pub const SOLVER_BUTTON: &str = "btn-solver";
    /// Solver prompt textarea
    pub const SOLVER_INPUT: &str = "solver-input";
    /// Solver submit button
    pub const SOLVE_BUTTON: &str = "btn-solve";
    /// Solver error line
    pub const SOLVER_ERROR: &str = "calc-solver-error";

    /// Id of the history row for entry `id`
    #[must_use]
    pub fn history_row(id: &str) -> String {
        format!("history-{id}")
    }
}

/// A DOM element
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    /// Element id
    pub id: String,
    /// Tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Whether the element is shown
    pub visible: bool,
    /// Children
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates an element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            visible: true,
            children: Vec::new(),
        }
    }

    /// Sets the id
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Starts hidden
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Adds a child
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets text content
    pub fn set_text(&mut self, text: &str) {
        self.text_content = text.to_string();
    }

    /// Adds a class once
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Adds or removes `class`
    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Checks for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Events the front end reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Click on an element
    Click {
        /// Clicked element
        element_id: String,
    },
    /// Text typed into an input
    Input {
        /// Input element
        element_id: String,
        /// New value
        value: String,
    },
    /// Window-level keydown
    KeyDown {
        /// `KeyboardEvent.key`
        key: String,
    },
}

impl DomEvent {
    /// Click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Input event
    #[must_use]
    pub fn input(element_id: &str, value: &str) -> Self {
        Self::Input {
            element_id: element_id.to_string(),
            value: value.to_string(),
        }
    }

    /// Keydown event
    #[must_use]
    pub fn key_down(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
        }
    }
}

/// In-memory document for the calculator page
#[derive(Debug)]
pub struct MockDom {
    /// Root element as built
    pub root: DomElement,
    elements: HashMap<String, DomElement>,
    event_history: Vec<DomEvent>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: DomElement::new("div").with_id("root"),
            elements: HashMap::new(),
            event_history: Vec::new(),
        }
    }

    /// The calculator page without keypad buttons
    #[must_use]
    pub fn calculator() -> Self {
        let mut dom = Self::new();

        let parts = [
            DomElement::new("div")
                .with_id(ids::EXPRESSION)
                .with_class("expression-line"),
            DomElement::new("div")
                .with_id(ids::DISPLAY)
                .with_class("value-display")
                .with_text("0"),
            DomElement::new("div")
                .with_id(ids::KEYPAD)
                .with_class("keypad"),
            DomElement::new("div")
                .with_id(ids::EXPLANATION)
                .with_class("explanation-toast")
                .hidden(),
            DomElement::new("button")
                .with_id(ids::DISMISS_EXPLANATION)
                .with_text("Dismiss"),
            DomElement::new("button")
                .with_id(ids::HISTORY_BUTTON)
                .with_attr("title", "History"),
            DomElement::new("aside")
                .with_id(ids::HISTORY_PANEL)
                .with_class("side-panel")
                .hidden(),
            DomElement::new("ul")
                .with_id(ids::HISTORY_LIST)
                .with_class("history-list"),
            DomElement::new("button")
                .with_id(ids::CLEAR_HISTORY_BUTTON)
                .with_text("Clear History"),
            DomElement::new("button")
                .with_id(ids::SOLVER_BUTTON)
                .with_attr("title", "AI Solver"),
            DomElement::new("div")
                .with_id(ids::SOLVER_PANEL)
                .with_class("modal")
                .hidden(),
            DomElement::new("textarea")
                .with_id(ids::SOLVER_INPUT)
                .with_attr("placeholder", "e.g. What is 20% of 85.5?")
                .with_attr("value", ""),
            DomElement::new("button")
                .with_id(ids::SOLVE_BUTTON)
                .with_text("Solve"),
            DomElement::new("p")
                .with_id(ids::SOLVER_ERROR)
                .with_class("error-text")
                .hidden(),
        ];

        let mut root = DomElement::new("div")
            .with_id(ids::ROOT)
            .with_class("calculator-app");
        for element in parts {
            root.children.push(element.clone());
            dom.register_element(element);
        }
        dom.root = root;
        dom
    }

    /// Registers an element for id lookup; elements without an id are skipped
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Looks an element up by id
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Mutable lookup
    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DomElement> {
        self.elements.get_mut(id)
    }

    /// Records an event; input events also update the element's value
    pub fn dispatch_event(&mut self, event: DomEvent) {
        if let DomEvent::Input { element_id, value } = &event {
            if let Some(elem) = self.elements.get_mut(element_id) {
                elem.attributes.insert("value".to_string(), value.clone());
            }
        }
        self.event_history.push(event);
    }

    /// Events seen so far
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Forgets recorded events
    pub fn clear_event_history(&mut self) {
        self.event_history.clear();
    }

    /// Sets an element's text
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.set_text(text);
        }
    }

    /// Reads an element's text
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Shows or hides an element
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.visible = visible;
        }
    }

    /// Whether an element exists and is shown
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    /// Current `value` of an input element
    #[must_use]
    pub fn input_value(&self, id: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.get_attr("value"))
    }

    /// Sets the `value` of an input element
    pub fn set_input_value(&mut self, id: &str, value: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.attributes.insert("value".to_string(), value.to_string());
        }
    }

    /// Sets or removes the `disabled` attribute
    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            if disabled {
                elem.attributes.insert("disabled".to_string(), String::new());
            } else {
                elem.attributes.remove("disabled");
            }
        }
    }

    /// Whether an element carries `disabled`
    #[must_use]
    pub fn is_disabled(&self, id: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.attributes.contains_key("disabled"))
    }

    /// Appends a child and registers it
    pub fn append_child(&mut self, parent_id: &str, child: DomElement) {
        if let Some(parent) = self.elements.get_mut(parent_id) {
            parent.children.push(child.clone());
        }
        self.register_element(child);
    }

    /// Children of an element
    #[must_use]
    pub fn children(&self, id: &str) -> &[DomElement] {
        self.elements
            .get(id)
            .map_or(&[], |e| e.children.as_slice())
    }

    /// Removes all children of an element and unregisters them
    pub fn clear_children(&mut self, id: &str) {
        let Some(elem) = self.elements.get_mut(id) else {
            return;
        };
        let removed = std::mem::take(&mut elem.children);
        for child in removed.iter().filter(|c| !c.id.is_empty()) {
            self.elements.remove(&child.id);
        }
    }
}
