//! Utility functions for WASM

use paysheet_lib::PaysheetError;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

/// Set up better panic messages in the browser console
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Log a message to the browser console
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn error(s: &str);
}

/// Convert a message into a JS `Error`
pub fn js_error(msg: &str) -> JsValue {
    js_sys::Error::new(msg).into()
}

/// Convert a library error into a JS `Error` carrying its numeric code
pub fn to_js_error(err: PaysheetError) -> JsValue {
    let value = js_sys::Error::new(&err.to_string());
    let _ = js_sys::Reflect::set(
        &value,
        &JsValue::from_str("code"),
        &JsValue::from_f64(err.code() as i32 as f64),
    );
    value.into()
}

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("No window object"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| js_error("No document object"))
}

/// Serialize into plain JS objects (not `Map`s), the shape callers expect.
pub fn to_plain_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| to_js_error(PaysheetError::Serialization(e.to_string())))
}

/// Treat `undefined` and `null` as an omitted argument.
pub fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

/// Run `callback` on the microtask queue, after the current call returns.
pub fn queue_microtask(callback: &js_sys::Function) {
    match window() {
        Ok(window) => window.queue_microtask(callback),
        Err(_) => warn("paysheet: no window to queue a callback on"),
    }
}
