//! Fraterno Web - Runs the Fraterno Amor widgets on the served pages.
//!
//! Compiled to WebAssembly and loaded by the page templates. On start the
//! live page is imported into a [`fraterno_widgets::Document`], the widgets
//! are mounted on it and browser events are routed to them. Every change the
//! widgets make is written back to the live page as [`fraterno_widgets::Patch`]es.
//!
//! - [`mirror`] - Import of the live page and patch application
//! - [`page`] - Event listeners, scroll observer and typing timer
//! - [`shell`] - Alerts and new windows through the browser window
//!
//! Build with:
//!
//! ```text
//! wasm-pack build crates/web --target web --out-dir ../storefront/static/pkg
//! ```

pub mod error;
pub mod mirror;
pub mod page;
pub mod shell;

pub use error::WebError;
pub use shell::BrowserShell;

use wasm_bindgen::prelude::*;

/// Entry point, called by the browser once the module is loaded.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let Some(window) = web_sys::window() else {
        web_sys::console::error_1(&JsValue::from_str("widgets need a browser window"));
        return;
    };
    if let Err(e) = page::attach(&window) {
        web_sys::console::error_1(&JsValue::from_str(&format!("widgets not attached: {e}")));
    }
}
