//! Browser bindings
//!
//! `BrowserCalculator` is the wasm-bindgen entry point. It renders into the
//! page's `#display` input and `#historyList` list and keeps history in
//! `window.localStorage`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, HtmlInputElement, Storage};

use super::dom::{key_to_token, DELETE_ITEM_CLASS, DISPLAY_ID, HISTORY_LIST_ID};
use crate::core::history::{encode_history, HistoryEntry};
use crate::core::token::Token;
use crate::render::Renderer;
use crate::session::Calculator;
use crate::store::{KeyValueStore, StoreError, StoreResult};

/// `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Opens the window's local storage
    pub fn open() -> StoreResult<Self> {
        let window = web_sys::window().ok_or_else(|| StoreError::unavailable("no window"))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::unavailable("localStorage disabled"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::unavailable(format!("{e:?}")))
    }
}

/// Renders into the live page
#[derive(Debug, Clone)]
pub struct DomRenderer {
    document: Document,
}

impl DomRenderer {
    /// Binds to the window's document
    pub fn new() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { document })
    }

    fn render_history(&self, entries: &[HistoryEntry]) -> Result<(), JsValue> {
        let Some(list) = self.document.get_element_by_id(HISTORY_LIST_ID) else {
            return Ok(());
        };
        list.set_inner_html("");

        for (index, entry) in entries.iter().enumerate().rev() {
            let item = self.document.create_element("li")?;
            item.set_text_content(Some(&entry.line()));

            let delete = self.document.create_element("button")?;
            delete.set_text_content(Some("x"));
            delete.set_class_name(DELETE_ITEM_CLASS);
            delete.set_attribute("data-index", &index.to_string())?;

            item.append_child(&delete)?;
            list.append_child(&item)?;
        }
        Ok(())
    }
}

impl Renderer for DomRenderer {
    fn show_display(&mut self, text: &str) {
        if let Some(input) = self
            .document
            .get_element_by_id(DISPLAY_ID)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(text);
        }
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        if let Err(e) = self.render_history(entries) {
            console::error_1(&e);
        }
    }
}

/// Browser calculator - the WASM entry point
#[wasm_bindgen]
#[derive(Debug)]
pub struct BrowserCalculator {
    calculator: Calculator<LocalStorage, DomRenderer>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Loads history from local storage and draws the page
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BrowserCalculator, JsValue> {
        console_error_panic_hook::set_once();

        let store = LocalStorage::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let renderer = DomRenderer::new()?;
        Ok(Self {
            calculator: Calculator::new(store, renderer),
        })
    }

    /// Handles a keypad button by its label and returns the new display
    pub fn press(&mut self, label: &str) -> Result<String, JsValue> {
        let token: Token = label
            .parse()
            .map_err(|e: crate::core::CalcError| JsValue::from_str(&e.to_string()))?;
        self.calculator.press(token);
        Ok(self.calculator.display())
    }

    /// Handles a `KeyboardEvent.key`; returns the new display if the key was a button
    pub fn handle_key(&mut self, key: &str) -> Option<String> {
        let token = key_to_token(key)?;
        self.calculator.press(token);
        Some(self.calculator.display())
    }

    /// Deletes the history entry at this storage index
    pub fn delete_history(&mut self, index: usize) {
        self.calculator.delete_history(index);
    }

    /// Deletes every history entry
    pub fn clear_history(&mut self) {
        self.calculator.clear_history();
    }

    /// Returns the display text
    pub fn display(&self) -> String {
        self.calculator.display()
    }

    /// Returns the history as the JSON payload stored in local storage
    pub fn history_json(&self) -> String {
        encode_history(self.calculator.history())
    }
}

/// Logs that the module loaded
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"abacus loaded".into());
}
