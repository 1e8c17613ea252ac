//! Browser front-end
//!
//! The mock DOM and its driver are always compiled so the page logic can be
//! tested natively; the real bindings need the `wasm` feature.

#[cfg(feature = "wasm")]
mod browser;
mod dom;
mod driver;

#[cfg(feature = "wasm")]
pub use browser::{BrowserCalculator, DomRenderer, LocalStorage};
pub use dom::{
    button_id, key_to_token, DomAction, DomElement, DomEvent, MockDom, BUTTONS_ID,
    CLEAR_HISTORY_ID, DELETE_ITEM_CLASS, DISPLAY_ID, HISTORY_LIST_ID,
};
pub use driver::WasmDriver;
