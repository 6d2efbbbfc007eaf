//! JavaScript API for the payment sheet.
//!
//! ```js
//! import init, { PaymentSheetWidget } from "paysheet-web";
//!
//! await init();
//! const sheet = new PaymentSheetWidget({ enablePassword: true, passwordLength: 4 });
//! sheet.on("payment-confirm", ({ method, amount, password }) => submit(method, amount, password));
//! sheet.open(25);
//! ```
//!
//! Subscriber callbacks run as microtasks after the triggering call returns,
//! so a callback may call straight back into the widget.

use crate::dom::{with_sheet, DomHost, SheetCell, SheetDom};
use crate::utils;
use js_sys::Function;
use paysheet_lib::{
    ConfigPatch, EventKind, FieldMapping, Handler, PaymentMethod, PaymentSheet, SheetEvent,
};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

/// JS callbacks per event, compared with `Object.is`.
#[derive(Default)]
struct JsSubscribers {
    confirm: Vec<Function>,
    close: Vec<Function>,
}

impl JsSubscribers {
    fn list_mut(&mut self, kind: EventKind) -> &mut Vec<Function> {
        match kind {
            EventKind::PaymentConfirm => &mut self.confirm,
            EventKind::PaymentClose => &mut self.close,
        }
    }

    fn list(&self, kind: EventKind) -> &[Function] {
        match kind {
            EventKind::PaymentConfirm => &self.confirm,
            EventKind::PaymentClose => &self.close,
        }
    }

    fn add(&mut self, kind: EventKind, callback: Function) -> bool {
        let list = self.list_mut(kind);
        if list.iter().any(|f| js_sys::Object::is(f, &callback)) {
            return false;
        }
        list.push(callback);
        true
    }

    fn remove(&mut self, kind: EventKind, callback: &Function) -> bool {
        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|f| !js_sys::Object::is(f, callback));
        list.len() != before
    }

    fn dispatch(&self, event: &SheetEvent) {
        let payload = match event {
            SheetEvent::Confirm(confirmation) => match utils::to_plain_js(confirmation) {
                Ok(payload) => payload,
                Err(_) => {
                    utils::warn("paysheet: could not convert the confirmation payload");
                    return;
                }
            },
            SheetEvent::Close => JsValue::UNDEFINED,
        };
        for callback in self.list(event.kind()) {
            utils::queue_microtask(&callback.bind1(&JsValue::NULL, &payload));
        }
    }

    fn clear(&mut self) {
        self.confirm.clear();
        self.close.clear();
    }
}

fn patch_from_js(config: &JsValue) -> ConfigPatch {
    if utils::is_absent(config) {
        return ConfigPatch::default();
    }
    let value: Value = match serde_wasm_bindgen::from_value(config.clone()) {
        Ok(value) => value,
        Err(err) => {
            utils::warn(&format!("paysheet: ignoring invalid config: {}", err));
            return ConfigPatch::default();
        }
    };
    let (patch, rejected) = ConfigPatch::from_value_lenient(&value);
    if !rejected.is_empty() {
        utils::warn(&format!(
            "paysheet: ignoring invalid config options: {}",
            rejected.join(", ")
        ));
    }
    patch
}

fn patch_from_element(element: &Element) -> ConfigPatch {
    let attributes = element
        .get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .filter_map(|name| {
            let value = element.get_attribute(&name)?;
            Some((name, value))
        })
        .collect::<Vec<_>>();
    ConfigPatch::from_attributes(attributes)
}

fn methods_from_js(methods: &JsValue) -> Option<Vec<PaymentMethod>> {
    if utils::is_absent(methods) {
        return None;
    }
    match serde_wasm_bindgen::from_value(methods.clone()) {
        Ok(methods) => Some(methods),
        Err(err) => {
            utils::warn(&format!("paysheet: ignoring invalid method list: {}", err));
            None
        }
    }
}

fn mapping_from_js(mapping: &JsValue) -> Option<FieldMapping> {
    if utils::is_absent(mapping) {
        return None;
    }
    match serde_wasm_bindgen::from_value(mapping.clone()) {
        Ok(mapping) => Some(mapping),
        Err(err) => {
            utils::warn(&format!("paysheet: ignoring invalid field mapping: {}", err));
            None
        }
    }
}

fn event_kind(name: &str) -> Option<EventKind> {
    match name.parse() {
        Ok(kind) => Some(kind),
        Err(err) => {
            utils::warn(&format!("paysheet: {}", err));
            None
        }
    }
}

/// A mounted payment sheet.
///
/// Cloning yields another handle to the same sheet.
#[wasm_bindgen]
#[derive(Clone)]
pub struct PaymentSheetWidget {
    sheet: Rc<SheetCell>,
    subscribers: Rc<RefCell<JsSubscribers>>,
}

impl PaymentSheetWidget {
    /// Build the markup inside `container` and wire the sheet to it.
    pub fn mount(document: &Document, container: &Element, patch: &ConfigPatch) -> Result<Self, JsValue> {
        let dom = SheetDom::build(document, container)?;
        let sheet = Rc::new_cyclic(|weak| {
            RefCell::new(PaymentSheet::with_config(
                DomHost::new(document.clone(), dom, weak.clone()),
                patch,
            ))
        });

        let subscribers = Rc::new(RefCell::new(JsSubscribers::default()));
        {
            let mut sheet = sheet.borrow_mut();
            for kind in [EventKind::PaymentConfirm, EventKind::PaymentClose] {
                let subscribers = Rc::clone(&subscribers);
                let forward: Handler = Rc::new(move |event: &SheetEvent| {
                    match subscribers.try_borrow() {
                        Ok(subscribers) => subscribers.dispatch(event),
                        Err(_) => utils::warn("paysheet: subscribers busy, event dropped"),
                    }
                });
                sheet.on(kind, forward);
            }
        }

        Ok(Self { sheet, subscribers })
    }

    /// Whether the markup is still attached.
    pub fn is_mounted(&self) -> bool {
        self.sheet
            .try_borrow()
            .map(|sheet| sheet.host().is_mounted())
            .unwrap_or(true)
    }

    /// Run `f` on a mounted sheet.
    fn with_sheet<R>(&self, f: impl FnOnce(&mut PaymentSheet<DomHost>) -> R) -> Option<R> {
        with_sheet(&self.sheet, |sheet| {
            if sheet.host().is_mounted() {
                Some(f(sheet))
            } else {
                utils::warn("paysheet: the widget has been destroyed");
                None
            }
        })
        .flatten()
    }
}

#[wasm_bindgen]
impl PaymentSheetWidget {
    /// Create a sheet appended to `document.body`, configured from an optional
    /// options object (`{ allowSwipeToClose, passwordLength, ... }`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PaymentSheetWidget, JsValue> {
        let document = utils::document()?;
        let body = document.body().ok_or_else(|| {
            utils::to_js_error(paysheet_lib::PaysheetError::HostUnavailable(
                "document.body is not available yet".into(),
            ))
        })?;
        Self::mount(&document, &body, &patch_from_js(&config))
    }

    /// Create a sheet inside `element`, configured from its attributes
    /// (`enable-password`, `data-password-length="4"`, ...).
    #[wasm_bindgen(js_name = fromElement)]
    pub fn from_element(element: &Element) -> Result<PaymentSheetWidget, JsValue> {
        let document = element
            .owner_document()
            .ok_or_else(|| utils::js_error("Element is not attached to a document"))?;
        Self::mount(&document, element, &patch_from_element(element))
    }

    /// The sheet's root element.
    #[wasm_bindgen(getter)]
    pub fn element(&self) -> Option<HtmlElement> {
        self.sheet
            .try_borrow()
            .ok()
            .map(|sheet| sheet.host().root().clone())
    }

    /// Show the sheet, optionally updating the amount.
    pub fn open(&self, amount: Option<f64>) {
        self.with_sheet(|sheet| sheet.open(amount));
    }

    pub fn close(&self) {
        self.with_sheet(|sheet| sheet.close());
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.with_sheet(|sheet| sheet.is_open()).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = setAmount)]
    pub fn set_amount(&self, amount: f64) {
        self.with_sheet(|sheet| sheet.set_amount(amount));
    }

    /// Replace the method list. Omitting it (or passing an empty array)
    /// restores the built-in methods.
    #[wasm_bindgen(js_name = setPaymentMethods)]
    pub fn set_payment_methods(&self, methods: JsValue, mapping: JsValue) {
        let methods = methods_from_js(&methods);
        let mapping = mapping_from_js(&mapping);
        self.with_sheet(|sheet| sheet.set_payment_methods(methods, mapping));
    }

    /// The selected method record, or `null`.
    #[wasm_bindgen(js_name = getSelectedMethod)]
    pub fn get_selected_method(&self) -> JsValue {
        self.with_sheet(|sheet| sheet.selected_method().map(utils::to_plain_js))
            .flatten()
            .and_then(Result::ok)
            .unwrap_or(JsValue::NULL)
    }

    /// Select the method whose identity equals `identity`.
    #[wasm_bindgen(js_name = selectMethod)]
    pub fn select_method(&self, identity: JsValue) -> bool {
        let Ok(identity) = serde_wasm_bindgen::from_value::<Value>(identity) else {
            return false;
        };
        self.with_sheet(|sheet| sheet.select_method_by_identity(&identity))
            .unwrap_or(false)
    }

    /// Adopt a configuration object; options it omits revert to defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, config: JsValue) {
        let patch = patch_from_js(&config);
        self.with_sheet(|sheet| sheet.set_config(&patch));
    }

    /// The effective configuration.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> JsValue {
        self.with_sheet(|sheet| utils::to_plain_js(sheet.config()))
            .and_then(Result::ok)
            .unwrap_or(JsValue::NULL)
    }

    /// Restore every option and the built-in methods.
    #[wasm_bindgen(js_name = resetConfig)]
    pub fn reset_config(&self) {
        self.with_sheet(|sheet| sheet.reset_config());
    }

    #[wasm_bindgen(js_name = setAllowSwipeToClose)]
    pub fn set_allow_swipe_to_close(&self, allow: bool) {
        self.with_sheet(|sheet| sheet.set_allow_swipe_to_close(allow));
    }

    #[wasm_bindgen(js_name = setCloseOnOverlayClick)]
    pub fn set_close_on_overlay_click(&self, close: bool) {
        self.with_sheet(|sheet| sheet.set_close_on_overlay_click(close));
    }

    #[wasm_bindgen(js_name = setEnablePassword)]
    pub fn set_enable_password(&self, enable: bool) {
        self.with_sheet(|sheet| sheet.set_enable_password(enable));
    }

    #[wasm_bindgen(js_name = setPasswordLength)]
    pub fn set_password_length(&self, length: f64) {
        if !length.is_finite() {
            return;
        }
        self.with_sheet(|sheet| sheet.set_password_length(length.round() as i64));
    }

    #[wasm_bindgen(js_name = setHeaderTitle)]
    pub fn set_header_title(&self, title: String) {
        self.with_sheet(|sheet| sheet.set_header_title(title));
    }

    #[wasm_bindgen(js_name = setCloseThreshold)]
    pub fn set_close_threshold(&self, px: f64) {
        self.with_sheet(|sheet| sheet.set_close_threshold(px));
    }

    #[wasm_bindgen(js_name = setCloseThresholdPercent)]
    pub fn set_close_threshold_percent(&self, percent: f64) {
        self.with_sheet(|sheet| sheet.set_close_threshold_percent(percent));
    }

    #[wasm_bindgen(js_name = setVelocityThreshold)]
    pub fn set_velocity_threshold(&self, px_per_ms: f64) {
        self.with_sheet(|sheet| sheet.set_velocity_threshold(px_per_ms));
    }

    /// Subscribe to `payment-confirm` or `payment-close`. Subscribing the same
    /// function twice has no further effect.
    pub fn on(&self, event: &str, callback: Function) -> bool {
        let Some(kind) = event_kind(event) else {
            return false;
        };
        self.subscribers.borrow_mut().add(kind, callback)
    }

    /// Unsubscribe a function previously passed to `on`.
    pub fn off(&self, event: &str, callback: &Function) -> bool {
        let Some(kind) = event_kind(event) else {
            return false;
        };
        self.subscribers.borrow_mut().remove(kind, callback)
    }

    /// Close the sheet if open, detach every listener and remove the markup.
    /// Later calls on any handle are ignored.
    pub fn destroy(&self) {
        self.with_sheet(|sheet| {
            sheet.close();
            sheet.host_mut().teardown();
        });
        self.subscribers.borrow_mut().clear();
    }
}

impl std::fmt::Debug for PaymentSheetWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sheet.try_borrow() {
            Ok(sheet) => std::fmt::Debug::fmt(&*sheet, f),
            Err(_) => f.write_str("PaymentSheetWidget { <busy> }"),
        }
    }
}
