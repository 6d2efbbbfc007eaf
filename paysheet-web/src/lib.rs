#![cfg(target_arch = "wasm32")]
//! Paysheet Web - WebAssembly bindings
//!
//! Mounts the payment bottom sheet into a browser page: builds its markup,
//! drives it from pointer and click input, and exposes the sheet to
//! JavaScript as [`PaymentSheetWidget`].

use wasm_bindgen::prelude::*;

mod dom;
mod listeners;
mod shared;
mod utils;
mod widget;

pub use dom::{classify_origin, DomHost, SheetDom};
pub use listeners::{EventCallback, ListenerSet};
pub use shared::{release_shared_payment_sheet, shared_payment_sheet};
pub use widget::PaymentSheetWidget;

/// Initialize the WASM module
///
/// Sets up panic hooks for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of the Paysheet WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
