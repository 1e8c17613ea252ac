//! Mock DOM for testing the browser calculator without a browser
//!
//! The element layout matches the page the browser build renders into:
//! an `#display` input, a `.buttons` grid, a `#historyList` list whose items
//! carry their own delete button, and a `#clearHistoryBtn` button. Clicks are
//! resolved the way the page's delegated listener resolves them: by tag,
//! class and text content.

use std::collections::HashMap;

use crate::core::history::HistoryEntry;
use crate::core::token::Token;
use crate::core::Operation;
use crate::render::Renderer;

/// Id of the display input
pub const DISPLAY_ID: &str = "display";
/// Id of the history list
pub const HISTORY_LIST_ID: &str = "historyList";
/// Id of the clear-history button
pub const CLEAR_HISTORY_ID: &str = "clearHistoryBtn";
/// Id of the keypad container
pub const BUTTONS_ID: &str = "buttons";
/// Class of the per-entry delete buttons
pub const DELETE_ITEM_CLASS: &str = "delete-history-item";

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Child elements
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element with an ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Sets an attribute value
    pub fn set_attr(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }
}

/// DOM events that can be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Click on an element
    Click {
        /// The ID of the clicked element
        element_id: String,
    },
    /// Key press on the page
    KeyPress {
        /// The `KeyboardEvent.key` value
        key: String,
    },
}

impl DomEvent {
    /// Creates a click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Creates a key press event
    #[must_use]
    pub fn key_press(key: &str) -> Self {
        Self::KeyPress {
            key: key.to_string(),
        }
    }
}

/// What a dispatched event asks the calculator to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomAction {
    /// Press a keypad button
    Press(Token),
    /// Delete the history entry at this storage index
    DeleteHistory(usize),
    /// Delete every history entry
    ClearHistory,
}

/// Returns the element id of the keypad button for `token`
#[must_use]
pub fn button_id(token: Token) -> String {
    let name = match token {
        Token::Digit(d) => return format!("btn-{d}"),
        Token::Decimal => "decimal",
        Token::Operator(Operation::Add) => "add",
        Token::Operator(Operation::Subtract) => "subtract",
        Token::Operator(Operation::Multiply) => "multiply",
        Token::Operator(Operation::Divide) => "divide",
        Token::Equals => "equals",
        Token::Clear => "clear",
        Token::Backspace => "backspace",
        Token::ToggleSign => "sign",
        Token::Percent => "percent",
    };
    format!("btn-{name}")
}

/// Maps a `KeyboardEvent.key` value to a token
#[must_use]
pub fn key_to_token(key: &str) -> Option<Token> {
    match key {
        "Enter" => Some(Token::Equals),
        "Escape" => Some(Token::Clear),
        "Backspace" => Some(Token::Backspace),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Token::from_char(c),
                _ => None,
            }
        }
    }
}

/// CSS class the page gives each kind of keypad button
fn button_class(token: Token) -> &'static str {
    match token {
        Token::Digit(0) => "zero",
        Token::Digit(_) => "number",
        Token::Decimal => "decimal",
        Token::Operator(_) | Token::ToggleSign | Token::Percent => "operator",
        Token::Equals => "equals",
        Token::Clear => "clear",
        Token::Backspace => "backspace",
    }
}

/// Resolves a keypad button the way the page listener does
fn token_for_button(element: &DomElement) -> Option<Token> {
    if element.tag != "button" {
        return None;
    }
    let text = element.text_content.as_str();
    if ["number", "zero", "decimal"].iter().any(|c| element.has_class(c)) {
        return text.parse().ok();
    }
    if element.has_class("operator") {
        return text.parse().ok();
    }
    if element.has_class("equals") {
        return Some(Token::Equals);
    }
    if element.has_class("clear") {
        return Some(Token::Clear);
    }
    if element.has_class("backspace") {
        return Some(Token::Backspace);
    }
    None
}

/// Mock DOM for testing the browser calculator
#[derive(Debug)]
pub struct MockDom {
    /// Elements by ID
    elements: HashMap<String, DomElement>,
    /// Event history for verification
    event_history: Vec<DomEvent>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::calculator()
    }
}

impl MockDom {
    /// Creates an empty mock DOM
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            event_history: Vec::new(),
        }
    }

    /// Creates the calculator page
    #[must_use]
    pub fn calculator() -> Self {
        let mut dom = Self::new();

        dom.register_element(
            DomElement::new("input")
                .with_id(DISPLAY_ID)
                .with_attr("type", "text")
                .with_attr("readonly", "")
                .with_attr("value", "0"),
        );

        let mut buttons = DomElement::new("div").with_id(BUTTONS_ID).with_class("buttons");
        for token in Token::ALL {
            let button = DomElement::new("button")
                .with_id(&button_id(token))
                .with_class(button_class(token))
                .with_text(&token.label());
            buttons.children.push(button.clone());
            dom.register_element(button);
        }
        dom.register_element(buttons);

        dom.register_element(DomElement::new("ul").with_id(HISTORY_LIST_ID));
        dom.register_element(
            DomElement::new("button")
                .with_id(CLEAR_HISTORY_ID)
                .with_text("Clear History"),
        );

        dom
    }

    /// Registers an element for ID lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Records an event and resolves what it asks for
    pub fn dispatch_event(&mut self, event: DomEvent) -> Option<DomAction> {
        self.event_history.push(event.clone());

        match event {
            DomEvent::KeyPress { key } => key_to_token(&key).map(DomAction::Press),
            DomEvent::Click { element_id } => {
                let element = self.elements.get(&element_id)?;
                if element.id == CLEAR_HISTORY_ID {
                    return Some(DomAction::ClearHistory);
                }
                if element.has_class(DELETE_ITEM_CLASS) {
                    return element
                        .get_attr("data-index")
                        .and_then(|index| index.parse().ok())
                        .map(DomAction::DeleteHistory);
                }
                token_for_button(element).map(DomAction::Press)
            }
        }
    }

    /// Gets the event history
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Returns the display input's value
    #[must_use]
    pub fn display_value(&self) -> &str {
        self.get_element(DISPLAY_ID)
            .and_then(|e| e.get_attr("value"))
            .unwrap_or_default()
    }

    /// Returns the history list item texts, top to bottom
    #[must_use]
    pub fn history_items(&self) -> Vec<String> {
        self.get_element(HISTORY_LIST_ID)
            .map(|list| list.children.iter().map(|li| li.text_content.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the id of the delete button on the list item at `row`
    #[must_use]
    pub fn delete_button_id(&self, row: usize) -> Option<String> {
        let list = self.get_element(HISTORY_LIST_ID)?;
        let item = list.children.get(row)?;
        item.children
            .iter()
            .find(|c| c.has_class(DELETE_ITEM_CLASS))
            .map(|c| c.id.clone())
    }

    /// Adds a child element to a parent
    fn append_child(&mut self, parent_id: &str, child: DomElement) {
        for grandchild in &child.children {
            self.register_element(grandchild.clone());
        }
        if let Some(parent) = self.elements.get_mut(parent_id) {
            parent.children.push(child.clone());
        }
        self.register_element(child);
    }

    /// Removes every child of an element, including registry entries
    fn clear_children(&mut self, id: &str) {
        let child_ids: Vec<String> = self
            .elements
            .get(id)
            .map(|elem| {
                elem.children
                    .iter()
                    .flat_map(|c| std::iter::once(c).chain(c.children.iter()))
                    .filter(|c| !c.id.is_empty())
                    .map(|c| c.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        for child_id in child_ids {
            self.elements.remove(&child_id);
        }
        if let Some(elem) = self.elements.get_mut(id) {
            elem.children.clear();
        }
    }
}

impl Renderer for MockDom {
    fn show_display(&mut self, text: &str) {
        if let Some(display) = self.elements.get_mut(DISPLAY_ID) {
            display.set_attr("value", text);
        }
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        self.clear_children(HISTORY_LIST_ID);

        for (row, (index, entry)) in entries.iter().enumerate().rev().enumerate() {
            let delete = DomElement::new("button")
                .with_id(&format!("history-delete-{index}"))
                .with_class(DELETE_ITEM_CLASS)
                .with_attr("data-index", &index.to_string())
                .with_text("x");
            let item = DomElement::new("li")
                .with_id(&format!("history-{row}"))
                .with_text(&entry.line())
                .with_child(delete);
            self.append_child(HISTORY_LIST_ID, item);
        }
    }
}
